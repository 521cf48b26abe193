//! Flashdeck Backend Binary
//!
//! Serves the auth API and token-gated pages on BIND_ADDR (e.g. 0.0.0.0:8080).

#[tokio::main]
async fn main() {
    fd_core::log();
    fd_core::interrupt();
    fd_server::run().await.unwrap();
}
