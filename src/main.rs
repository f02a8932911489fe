// `main.rs` only declares modules and delegates to `server::run()`. Config
// loading, the Firebase client, record shaping, handlers and the static
// frontend mount each live in their own module under `src/`.
mod config;
mod error;
mod firebase;
mod handlers;
mod readings;
mod server;
mod static_files;

/// Start the service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    server::run().await
}
