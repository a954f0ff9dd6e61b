use anyhow::Result;
use clap::Parser;
use nyushi_scout::{cli, launch, logging};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = cli::Args::parse();
    let verbose = args.verbose;
    logging::init(verbose);

    let config = args.into_config()?;
    launch(&config).await
}
