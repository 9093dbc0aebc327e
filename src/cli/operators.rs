use crate::{
    api::catalog, cli::OperatorsArgs, prelude::*, tables::build_operator_table,
};

#[instrument(skip_all)]
pub async fn operators(args: &OperatorsArgs) -> Result {
    let catalog = catalog::Api::new(&args.catalog.api_url, args.catalog.prices_dir())?;
    let operators = catalog.retrieve_operators(args.force).await?;
    info!(n_operators = operators.len(), "retrieved");
    println!("{}", build_operator_table(&operators));
    Ok(())
}
