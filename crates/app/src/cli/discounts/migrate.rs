use std::io;

use clap::Args;
use porter::destination::DestinationContext;
use porter_app::{
    config::{DestinationArgs, SelectionArgs, SourceArgs},
    destination::{BrandChoice, resolve_brand},
    migration::{self, preview},
    prompt,
};

#[derive(Debug, Args)]
pub(crate) struct MigrateArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    destination: DestinationArgs,

    #[command(flatten)]
    selection: SelectionArgs,

    /// Brand to create discounts under; prompted for when several exist
    #[arg(long, env = "DESTINATION_BRAND_ID")]
    brand_id: Option<String>,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    yes: bool,

    /// Preview without creating anything
    #[arg(long)]
    dry_run: bool,
}

pub(crate) async fn run(args: MigrateArgs) -> Result<(), String> {
    let selection = args.selection.selection();
    let destination = args.destination.connect();

    let mut source = args
        .source
        .connect()
        .map_err(|error| format!("failed to build source client: {error}"))?;

    let brand_id = match resolve_brand(&destination, args.brand_id)
        .await
        .map_err(|error| format!("failed to resolve brand: {error}"))?
    {
        BrandChoice::Selected(brand_id) => brand_id,
        BrandChoice::Ambiguous(brands) => {
            prompt::choose_brand(&brands, &mut io::stdin().lock(), &mut io::stdout())
                .map_err(|error| format!("failed to read brand choice: {error}"))?
        }
    };

    let context = DestinationContext::new(brand_id);

    let plan = migration::plan(source.as_mut(), selection, &context)
        .await
        .map_err(|error| format!("failed to import discounts: {error}"))?;

    for rejection in &plan.rejected {
        println!("skipping {}: {}", rejection.code, rejection.error);
    }

    if plan.is_empty() {
        println!("nothing to migrate ({})", preview::summary(&plan));
        return Ok(());
    }

    println!("{}", preview::render_requests(&plan.requests));
    println!("{}", preview::summary(&plan));

    if args.dry_run {
        println!("dry run; no discounts were created");
        return Ok(());
    }

    if !args.yes {
        let question = format!(
            "Create {} discounts under brand {}?",
            plan.requests.len(),
            context.brand_id()
        );

        let confirmed = prompt::confirm(&question, &mut io::stdin().lock(), &mut io::stdout())
            .map_err(|error| format!("failed to read confirmation: {error}"))?;

        if !confirmed {
            println!("aborted");
            return Ok(());
        }
    }

    let report = migration::execute(&destination, &plan).await;

    for created in &report.created {
        println!("created {} ({})", created.code, created.discount_id);
    }

    for failed in &report.failed {
        println!("failed {}: {}", failed.code, failed.error);
    }

    if !report.is_success() {
        return Err(format!(
            "{} of {} discounts failed to migrate",
            report.failed.len(),
            plan.requests.len()
        ));
    }

    println!("migrated {} discounts", report.created.len());

    Ok(())
}
