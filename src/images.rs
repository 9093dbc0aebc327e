//! Content-addressed local store for operator and card logos.

use std::{
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering},
};

use reqwest::{Client, Url};

use crate::{api::client, error::TariffError, prelude::*};

/// The two asset classes sharing the store. The prefix keeps an operator
/// logo and a card logo with the same checksum from colliding.
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum ImageRole {
    #[display("cpo")]
    Operator,

    #[display("card")]
    Card,
}

pub struct ImageCache {
    client: Client,
    root: PathBuf,
}

static STAGING_SEQUENCE: AtomicU64 = AtomicU64::new(0);

impl ImageCache {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("failed to create `{}`", root.display()))?;
        Ok(Self { client: client::try_new()?, root })
    }

    /// Canonical path for the locator. The upstream file name is its
    /// content checksum.
    pub fn path_for(&self, locator: &Url, role: ImageRole) -> Result<PathBuf> {
        let checksum = locator
            .path_segments()
            .and_then(Iterator::last)
            .filter(|segment| !segment.is_empty())
            .with_context(|| format!("`{locator}` has no file name"))?;
        Ok(self.root.join(format!("{role}_{checksum}.jpg")))
    }

    /// Whether the asset is already stored locally. A pure file stat.
    pub fn has(&self, locator: &Url, role: ImageRole) -> bool {
        self.path_for(locator, role).is_ok_and(|path| path.is_file())
    }

    /// Local path for the asset, downloading it once if needed.
    ///
    /// The file appears at the canonical path atomically; a failed
    /// download leaves nothing behind there.
    #[instrument(skip_all, fields(locator = %locator, role = %role))]
    pub async fn ensure(&self, locator: &Url, role: ImageRole) -> Result<PathBuf, TariffError> {
        self.ensure_fallibly(locator, role).await.map_err(|error| TariffError::download(&error))
    }

    async fn ensure_fallibly(&self, locator: &Url, role: ImageRole) -> Result<PathBuf> {
        let path = self.path_for(locator, role)?;
        if path.is_file() {
            debug!("already stored");
            return Ok(path);
        }
        info!("downloading…");
        let bytes = self
            .client
            .get(locator.clone())
            .send()
            .await
            .context("failed to call the asset source")?
            .error_for_status()
            .context("the download request failed")?
            .bytes()
            .await
            .context("failed to read the image body")?;
        let staging = self.root.join(format!(
            ".{}-{}.part",
            std::process::id(),
            STAGING_SEQUENCE.fetch_add(1, Ordering::Relaxed),
        ));
        std::fs::write(&staging, &bytes)
            .with_context(|| format!("failed to write `{}`", staging.display()))?;
        std::fs::rename(&staging, &path)
            .with_context(|| format!("failed to publish `{}`", path.display()))?;
        Ok(path)
    }
}
