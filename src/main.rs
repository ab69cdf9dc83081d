#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fleetdash::bootstrapper::run().await
}
