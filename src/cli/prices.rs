use crate::{
    api::catalog,
    cli::PricesArgs,
    core::refresh::Refresher,
    prelude::*,
    tables::build_price_table,
};

#[instrument(skip_all)]
pub async fn prices(args: &PricesArgs) -> Result {
    let catalog = catalog::Api::new(&args.catalog.api_url, args.catalog.prices_dir())?;
    let refresher = Refresher::new(catalog, args.maingau_customer);
    let entries = refresher.refresh(&args.operator, args.force).await?;
    ensure!(!entries.is_empty(), "the catalog has no cards for `{}`", args.operator);
    info!(n_entries = entries.len(), "merged");
    println!("{}", build_price_table(&entries));
    Ok(())
}
