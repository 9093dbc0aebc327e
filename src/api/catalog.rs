//! Tariff catalog client with a local copy of the fetched documents.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    api::{client, source::CardSource},
    core::card::{Operator, OperatorPrices},
    prelude::*,
};

pub struct Api {
    client: Client,
    base_url: String,
    cache_dir: PathBuf,
}

impl Api {
    pub fn new(base_url: impl Into<String>, cache_dir: impl Into<PathBuf>) -> Result<Self> {
        let cache_dir = cache_dir.into();
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("failed to create `{}`", cache_dir.display()))?;
        Ok(Self { client: client::try_new()?, base_url: base_url.into(), cache_dir })
    }

    /// All operators known to the catalog.
    #[instrument(skip_all, fields(force_download = force_download))]
    pub async fn retrieve_operators(&self, force_download: bool) -> Result<Vec<Operator>> {
        let cache_path = self.cache_dir.join("operators.json");
        if !force_download && let Some(operators) = read_cached(&cache_path) {
            info!("serving the cached copy");
            return Ok(operators);
        }
        let operators: Vec<Operator> = self.get("operators").await?;
        write_cache(&cache_path, &operators);
        Ok(operators)
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(path = path))]
    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        info!("fetching…");
        self.client
            .get(format!("{}/{path}", self.base_url))
            .send()
            .await
            .with_context(|| format!("failed to call `{path}`"))?
            .error_for_status()
            .with_context(|| format!("`{path}` request failed"))?
            .json::<R>()
            .await
            .with_context(|| format!("failed to deserialize the `{path}` response"))
    }
}

#[async_trait]
impl CardSource for Api {
    #[instrument(skip_all, fields(operator_id = operator_id, force_download = force_download))]
    async fn retrieve_cards(
        &self,
        operator_id: &str,
        force_download: bool,
    ) -> Result<OperatorPrices> {
        let cache_path = self.cache_dir.join(format!("{operator_id}.json"));
        if !force_download && let Some(prices) = read_cached(&cache_path) {
            info!("serving the cached copy");
            return Ok(prices);
        }
        let prices: OperatorPrices = self.get(&format!("cards/{operator_id}")).await?;
        write_cache(&cache_path, &prices);
        Ok(prices)
    }
}

/// Read and parse a cached document, or `None` with a logged reason.
fn read_cached<T: DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.is_file() {
        return None;
    }
    match read_fallibly(path) {
        Ok(document) => Some(document),
        Err(error) => {
            warn!(path = %path.display(), "ignoring the cached copy: {error:#}");
            None
        }
    }
}

fn read_fallibly<T: DeserializeOwned>(path: &Path) -> Result<T> {
    Ok(serde_json::from_slice(&std::fs::read(path)?)?)
}

/// Cache write failures are logged, never propagated.
fn write_cache<T: Serialize>(path: &Path, document: &T) {
    let result = serde_json::to_vec(document)
        .map_err(Error::from)
        .and_then(|bytes| std::fs::write(path, bytes).map_err(Error::from));
    if let Err(error) = result {
        error!(path = %path.display(), "failed to write the cached copy: {error:#}");
    }
}
