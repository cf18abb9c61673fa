use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    stroyhelper::run().await
}
