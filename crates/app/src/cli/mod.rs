use clap::{Parser, Subcommand};
use porter_app::config::LoggingConfig;

mod brands;
mod discounts;

#[derive(Debug, Parser)]
#[command(name = "porter", about = "Migrate discounts between commerce platforms", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Discounts(discounts::DiscountsCommand),
    Brands(brands::BrandsCommand),
}

impl Cli {
    pub(crate) fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Discounts(command) => discounts::run(command).await,
            Commands::Brands(command) => brands::run(command).await,
        }
    }
}
