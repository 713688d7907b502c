use clap::Args;
use porter::discounts::filter::filter;
use porter_app::{
    config::{SelectionArgs, SourceArgs},
    migration::preview::render_discounts,
    sources::import,
};

#[derive(Debug, Args)]
pub(crate) struct ListDiscountsArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    selection: SelectionArgs,
}

pub(crate) async fn run(args: ListDiscountsArgs) -> Result<(), String> {
    let selection = args.selection.selection();

    let mut source = args
        .source
        .connect()
        .map_err(|error| format!("failed to build source client: {error}"))?;

    let discounts = import(source.as_mut())
        .await
        .map_err(|error| format!("failed to import discounts: {error}"))?;

    let selected = filter(&discounts, selection.status, selection.kind);

    if selected.is_empty() {
        println!("no matching discounts ({} imported)", discounts.len());
        return Ok(());
    }

    println!("{}", render_discounts(&selected));
    println!("{} of {} discounts shown", selected.len(), discounts.len());

    Ok(())
}
