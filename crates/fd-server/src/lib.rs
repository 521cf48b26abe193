//! Flashdeck Backend Server
//!
//! Wires the auth core into a single actix-web server: the JSON auth API,
//! the admin roster, and the browser-facing pages that redirect to the
//! login entry point when unauthenticated.

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use std::sync::Arc;
use tokio_postgres::Client;

async fn health(client: web::Data<Arc<Client>>) -> impl Responder {
    match client
        .execute("SELECT 1", &[])
        .await
        .inspect_err(|e| log::error!("health check failed: {}", e))
    {
        Ok(_) => HttpResponse::Ok().body("ok"),
        Err(_) => HttpResponse::ServiceUnavailable().body("database unavailable"),
    }
}

/// Login entry point for browser navigation; the page itself is rendered
/// client-side, this just anchors the redirect target.
async fn login_page() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body("<!doctype html><html><head><title>flashdeck</title></head><body><h1>Sign in to flashdeck</h1></body></html>")
}

async fn sets_page(auth: fd_auth::PageAuth) -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(format!(
            "<!doctype html><html><head><title>flashdeck</title></head><body><h1>{}'s sets</h1></body></html>",
            auth.identity().username()
        ))
}

#[rustfmt::skip]
pub async fn run() -> Result<(), std::io::Error> {
    let client = fd_pg::db().await;
    fd_pg::ensure::<fd_auth::Member>(&client).await.expect("users table");
    let crypto = web::Data::new(fd_auth::Crypto::from_env());
    let hasher = web::Data::new(fd_auth::Hasher::from_env());
    let client = web::Data::new(client);
    log::info!("starting flashdeck server");
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(crypto.clone())
            .app_data(hasher.clone())
            .app_data(client.clone())
            .route("/health", web::get().to(health))
            .route("/login", web::get().to(login_page))
            .route("/sets", web::get().to(sets_page))
            .service(
                web::scope("/api/auth")
                    .route("/register", web::post().to(fd_auth::register))
                    .route("/login", web::post().to(fd_auth::login))
                    .route("/logout", web::post().to(fd_auth::logout))
                    .route("/validate-token", web::get().to(fd_auth::validate_token))
                    .route("/user-info", web::get().to(fd_auth::user_info)),
            )
            .service(
                web::scope("/api/admin")
                    .route("/users", web::get().to(fd_auth::roster)),
            )
    })
    .workers(6)
    .bind(std::env::var("BIND_ADDR").expect("BIND_ADDR must be set"))?
    .run()
    .await
}
