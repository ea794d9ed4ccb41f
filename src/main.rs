use anyhow::Result;

use football_scrape::{logger, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    logger::init();

    let config = Config::from_env();

    App::new(config).run().await
}
