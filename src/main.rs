use clap::{Parser, crate_version};
use ladetarif::{
    cli::{self, Args, Command},
    prelude::*,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Prices(args) => cli::prices(&args).await?,
        Command::Operators(args) => cli::operators(&args).await?,
        Command::Logo(args) => cli::logo(&args).await?,
    }

    info!("done!");
    Ok(())
}
