use clap::{Args, Subcommand};

mod list;

#[derive(Debug, Args)]
pub(crate) struct BrandsCommand {
    #[command(subcommand)]
    command: BrandsSubcommand,
}

#[derive(Debug, Subcommand)]
enum BrandsSubcommand {
    /// List brands visible to the destination API key
    List(list::ListBrandsArgs),
}

pub(crate) async fn run(command: BrandsCommand) -> Result<(), String> {
    match command.command {
        BrandsSubcommand::List(args) => list::run(args).await,
    }
}
