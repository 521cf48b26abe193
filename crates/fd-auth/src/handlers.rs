use super::*;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use std::sync::Arc;
use tokio_postgres::Client;

pub async fn register(
    db: web::Data<Arc<Client>>,
    hasher: web::Data<Hasher>,
    req: web::Json<RegisterRequest>,
) -> impl Responder {
    if req.username.len() < fd_core::USERNAME_MIN || req.username.len() > fd_core::USERNAME_MAX {
        return HttpResponse::BadRequest()
            .json(RegisterResponse::refused("username must be 3-32 characters"));
    }
    if req.password.len() < fd_core::PASSWORD_MIN {
        return HttpResponse::BadRequest().json(RegisterResponse::refused(
            "password must be at least 8 characters",
        ));
    }
    match service::register(
        db.get_ref(),
        &hasher,
        &req.username,
        &req.email,
        &req.password,
        &req.confirm_password,
    )
    .await
    {
        Ok(()) => HttpResponse::Ok().json(RegisterResponse::accepted()),
        Err(RegisterError::Fault(e)) => {
            log::error!("registration failed: {}", e);
            HttpResponse::InternalServerError().json(RegisterResponse::refused("internal error"))
        }
        Err(refused) => HttpResponse::BadRequest().json(RegisterResponse::refused(&refused.to_string())),
    }
}

pub async fn login(
    db: web::Data<Arc<Client>>,
    hasher: web::Data<Hasher>,
    crypto: web::Data<Crypto>,
    req: web::Json<LoginRequest>,
) -> impl Responder {
    match service::login(db.get_ref(), &hasher, &crypto, &req.username, &req.password).await {
        Ok((identity, token)) => HttpResponse::Ok().json(LoginResponse::granted(token, &identity)),
        Err(LoginError::Fault(e)) => {
            log::error!("login failed: {}", e);
            HttpResponse::InternalServerError().json(LoginResponse::refused("internal error"))
        }
        Err(refused) => HttpResponse::BadRequest().json(LoginResponse::refused(&refused.to_string())),
    }
}

pub async fn validate_token(_auth: Auth) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "isValid": true }))
}

pub async fn user_info(db: web::Data<Arc<Client>>, auth: Auth) -> impl Responder {
    match db.get_ref().fetch(auth.user()).await {
        Ok(Some(member)) => HttpResponse::Ok().json(UserInfo::from(&member)),
        Ok(None) => {
            HttpResponse::NotFound().json(serde_json::json!({ "message": "account not found" }))
        }
        Err(e) => {
            log::error!("user info failed: {}", e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "message": "internal error" }))
        }
    }
}

/// Tokens are self-contained, so there is nothing to revoke server-side;
/// the client discards its copy.
pub async fn logout() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "message": "logged out successfully" }))
}

pub async fn roster(db: web::Data<Arc<Client>>, _admin: Admin) -> impl Responder {
    match db.get_ref().roster().await {
        Ok(members) => HttpResponse::Ok().json(RosterResponse::from(members)),
        Err(e) => {
            log::error!("roster failed: {}", e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "message": "internal error" }))
        }
    }
}
