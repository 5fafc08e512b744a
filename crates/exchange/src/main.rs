#[tokio::main]
async fn main() {
    exchange::run::main().await;
}
