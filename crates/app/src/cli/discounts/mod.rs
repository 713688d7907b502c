use clap::{Args, Subcommand};

mod list;
mod migrate;

#[derive(Debug, Args)]
pub(crate) struct DiscountsCommand {
    #[command(subcommand)]
    command: DiscountsSubcommand,
}

#[derive(Debug, Subcommand)]
enum DiscountsSubcommand {
    /// Show the discounts a provider currently has
    List(list::ListDiscountsArgs),

    /// Copy discounts from a provider to the destination
    Migrate(migrate::MigrateArgs),
}

pub(crate) async fn run(command: DiscountsCommand) -> Result<(), String> {
    match command.command {
        DiscountsSubcommand::List(args) => list::run(args).await,
        DiscountsSubcommand::Migrate(args) => migrate::run(args).await,
    }
}
