use super::*;
use actix_web::FromRequest;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::ResponseError;
use actix_web::dev::Payload;
use actix_web::web;
use fd_core::ID;
use std::future::Ready;
use std::future::ready;

/// Gate failures rendered per the route's declared style: structured JSON
/// for API routes, a login redirect for browser pages. Never a stack
/// trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    Unauthenticated,
    Forbidden,
    LoginRedirect,
}

impl std::fmt::Display for GateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "authentication required"),
            Self::Forbidden => write!(f, "admin access required"),
            Self::LoginRedirect => write!(f, "redirecting to login"),
        }
    }
}

impl ResponseError for GateError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            Self::Unauthenticated => actix_web::http::StatusCode::UNAUTHORIZED,
            Self::Forbidden => actix_web::http::StatusCode::FORBIDDEN,
            Self::LoginRedirect => actix_web::http::StatusCode::FOUND,
        }
    }
    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Unauthenticated => HttpResponse::Unauthorized()
                .json(serde_json::json!({ "message": "authentication required" })),
            Self::Forbidden => HttpResponse::Forbidden()
                .json(serde_json::json!({ "message": "admin access required" })),
            Self::LoginRedirect => HttpResponse::Found()
                .insert_header((actix_web::http::header::LOCATION, fd_core::LOGIN_PATH))
                .finish(),
        }
    }
}

/// Resolves the request's bearer token and decodes it into an identity.
/// None when no source yields a token or any validity check fails.
pub fn authenticate(req: &HttpRequest) -> Option<Identity> {
    let crypto = match req.app_data::<web::Data<Crypto>>() {
        Some(found) => found,
        None => {
            log::error!("token codec not configured");
            return None;
        }
    };
    let token = resolver::from_request(req)?;
    crypto
        .decode(&token)
        .inspect_err(|e| log::debug!("rejected token: {}", e))
        .ok()
}

fn gate(req: &HttpRequest, policy: Policy) -> Result<Identity, Deny> {
    let identity = authenticate(req);
    authorize(identity.as_ref(), policy)?;
    identity.ok_or(Deny::Unauthenticated)
}

/// Extractor for API routes open to any registered user.
#[derive(Debug)]
pub struct Auth(pub Identity);

impl Auth {
    pub fn identity(&self) -> &Identity {
        &self.0
    }
    pub fn user(&self) -> ID<Member> {
        self.0.id()
    }
}

impl FromRequest for Auth {
    type Error = GateError;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(gate(req, Policy::AnyAuthenticated).map(Self).map_err(|_| GateError::Unauthenticated))
    }
}

/// Extractor for API routes restricted to admins: 401 when anonymous,
/// 403 when authenticated without the role.
#[derive(Debug)]
pub struct Admin(pub Identity);

impl Admin {
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

impl FromRequest for Admin {
    type Error = GateError;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(gate(req, Policy::AdminOnly).map(Self).map_err(|deny| match deny {
            Deny::Unauthenticated => GateError::Unauthenticated,
            Deny::Forbidden => GateError::Forbidden,
        }))
    }
}

/// Optional authentication extractor - does not fail if unauthenticated.
#[derive(Debug)]
pub struct MaybeAuth(pub Option<Identity>);

impl MaybeAuth {
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
    pub fn user(&self) -> Option<ID<Member>> {
        self.0.as_ref().map(|found| found.id())
    }
}

impl FromRequest for MaybeAuth {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self(authenticate(req))))
    }
}

/// Extractor for browser-facing routes: an unauthenticated visitor is
/// redirected to the login entry point instead of receiving JSON.
#[derive(Debug)]
pub struct PageAuth(pub Identity);

impl PageAuth {
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

impl FromRequest for PageAuth {
    type Error = GateError;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(gate(req, Policy::AnyAuthenticated).map(Self).map_err(|_| GateError::LoginRedirect))
    }
}
