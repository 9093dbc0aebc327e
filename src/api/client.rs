use std::time::Duration;

use reqwest::Client;

use crate::prelude::*;

/// Build the default HTTP client.
pub fn try_new() -> Result<Client> {
    Ok(Client::builder().user_agent("ladetarif").timeout(Duration::from_secs(15)).build()?)
}
