use tracing::error;

use crate::domain::{EntityDetail, Outcome, Page};
use crate::remote::PokeApiClient;

/// Wraps the remote client and converts every failure into an
/// [`Outcome::Error`] carrying a display message. This is the only place
/// errors are translated; everything above it is total.
pub struct Gateway<C> {
    client: C,
}

impl<C: PokeApiClient> Gateway<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub async fn fetch_page(&self, limit: u32, offset: u32) -> Outcome<Page> {
        match self.client.fetch_page(limit, offset).await {
            Ok(page) => Outcome::Success(page),
            Err(err) => {
                error!(limit, offset, %err, "catalog page fetch failed");
                Outcome::Error(format!("can't fetch catalog page: {err}"))
            }
        }
    }

    /// `name` must already be lowercased by the caller.
    pub async fn fetch_detail(&self, name: &str) -> Outcome<EntityDetail> {
        match self.client.fetch_detail(name).await {
            Ok(detail) => Outcome::Success(detail),
            Err(err) => {
                error!(name, %err, "entity detail fetch failed");
                Outcome::Error(format!("can't fetch entity detail: {err}"))
            }
        }
    }
}
