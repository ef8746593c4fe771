#[tokio::main]
async fn main() {
    if let Err(e) = nobat::run().await {
        eprintln!("nobat failed to start: {e}");
        std::process::exit(1);
    }
}
