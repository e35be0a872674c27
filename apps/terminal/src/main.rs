#[tokio::main]
async fn main() -> anyhow::Result<()> {
    flashmaster::run().await
}
