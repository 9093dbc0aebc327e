mod logo;
mod operators;
mod prices;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use self::{logo::logo, operators::operators, prices::prices};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch and display the merged AC/DC price table for an operator.
    Prices(PricesArgs),

    /// List the operators known to the catalog.
    Operators(OperatorsArgs),

    /// Download an operator or card logo and print its local path.
    Logo(LogoArgs),
}

#[derive(clap::Args)]
pub struct CatalogArgs {
    /// Catalog API root.
    #[clap(long, env = "LADETARIF_API_URL", default_value = "https://api.ladetarif.app")]
    pub api_url: String,

    /// Local cache directory for price lists and logos.
    #[clap(long, env = "LADETARIF_CACHE_DIR", default_value = ".ladetarif")]
    pub cache_dir: PathBuf,
}

impl CatalogArgs {
    pub fn prices_dir(&self) -> PathBuf {
        self.cache_dir.join("prices")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.cache_dir.join("images")
    }
}

#[derive(clap::Args)]
pub struct PricesArgs {
    /// Operator identifier, for example `enbw`.
    pub operator: String,

    /// Bypass the locally cached price lists and always hit the network.
    #[clap(long)]
    pub force: bool,

    /// Apply the personalized EinfachStromLaden rates.
    #[clap(long, env = "LADETARIF_MAINGAU_CUSTOMER")]
    pub maingau_customer: bool,

    #[clap(flatten)]
    pub catalog: CatalogArgs,
}

#[derive(clap::Args)]
pub struct OperatorsArgs {
    /// Bypass the locally cached operator list.
    #[clap(long)]
    pub force: bool,

    #[clap(flatten)]
    pub catalog: CatalogArgs,
}

#[derive(clap::Args)]
pub struct LogoArgs {
    /// Operator identifier.
    pub operator: String,

    /// Download this card's logo instead of the operator's.
    #[clap(long)]
    pub card: Option<String>,

    #[clap(flatten)]
    pub catalog: CatalogArgs,
}
