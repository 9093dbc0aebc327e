use async_trait::async_trait;

use crate::{core::card::OperatorPrices, prelude::*};

/// The catalog data source: operator metadata and price lists.
#[async_trait]
pub trait CardSource: Send + Sync {
    /// Retrieve the operator's metadata and its AC and DC price lists.
    ///
    /// With `force_download`, any locally cached copy is bypassed and the
    /// network is always hit.
    async fn retrieve_cards(
        &self,
        operator_id: &str,
        force_download: bool,
    ) -> Result<OperatorPrices>;
}
