use crate::prelude::*;

/// Errors crossing the refresher and image cache boundaries.
///
/// Cloneable, so one outcome can be handed to every caller coalesced onto
/// the same in-flight fetch. The formatted cause chain is carried in the
/// message.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TariffError {
    #[error("failed to fetch the price lists: {0}")]
    FetchFailed(String),

    #[error("failed to download the image: {0}")]
    DownloadFailed(String),
}

impl TariffError {
    pub fn fetch(error: &Error) -> Self {
        Self::FetchFailed(format!("{error:#}"))
    }

    pub fn download(error: &Error) -> Self {
        Self::DownloadFailed(format!("{error:#}"))
    }
}
