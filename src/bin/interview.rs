#[path = "interview/app.rs"]
mod app;
#[path = "interview/args.rs"]
mod args;
#[path = "interview/logging.rs"]
mod logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
