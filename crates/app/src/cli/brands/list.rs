use clap::Args;
use porter_app::{config::DestinationArgs, destination::DestinationApi};

#[derive(Debug, Args)]
pub(crate) struct ListBrandsArgs {
    #[command(flatten)]
    destination: DestinationArgs,
}

pub(crate) async fn run(args: ListBrandsArgs) -> Result<(), String> {
    let destination = args.destination.connect();

    let brands = destination
        .list_brands()
        .await
        .map_err(|error| format!("failed to list brands: {error}"))?;

    if brands.is_empty() {
        println!("no brands found");
        return Ok(());
    }

    for brand in brands {
        match brand.name {
            Some(name) => println!("{}\t{name}", brand.brand_id),
            None => println!("{}", brand.brand_id),
        }
    }

    Ok(())
}
