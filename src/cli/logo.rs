use reqwest::Url;

use crate::{
    api::{catalog, source::CardSource},
    cli::LogoArgs,
    images::{ImageCache, ImageRole},
    prelude::*,
};

#[instrument(skip_all)]
pub async fn logo(args: &LogoArgs) -> Result {
    let catalog = catalog::Api::new(&args.catalog.api_url, args.catalog.prices_dir())?;
    let prices = catalog.retrieve_cards(&args.operator, false).await?;

    let (locator, role) = match &args.card {
        Some(identifier) => {
            let card = prices
                .ac
                .iter()
                .chain(prices.dc.iter())
                .find(|card| &card.identifier == identifier)
                .with_context(|| format!("`{}` has no card `{identifier}`", args.operator))?;
            let locator = card
                .image
                .as_deref()
                .with_context(|| format!("card `{identifier}` has no logo"))?;
            (locator.to_owned(), ImageRole::Card)
        }
        None => {
            let locator = prices
                .operator
                .image
                .as_deref()
                .with_context(|| format!("operator `{}` has no logo", args.operator))?;
            (locator.to_owned(), ImageRole::Operator)
        }
    };

    let locator =
        Url::parse(&locator).with_context(|| format!("invalid logo locator `{locator}`"))?;
    let cache = ImageCache::new(args.catalog.images_dir())?;
    let path = cache.ensure(&locator, role).await?;
    println!("{}", path.display());
    Ok(())
}
