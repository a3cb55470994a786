use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::domain::{EntityDetail, NamedResource, Page, SpriteSet, Stat, TypeTag};
use crate::error::DexError;

/// Remote catalog API. The trait is the seam for tests and alternative
/// transports; retry policy deliberately lives above this layer, behind the
/// store's `retry` intent.
#[async_trait]
pub trait PokeApiClient: Send + Sync {
    async fn fetch_page(&self, limit: u32, offset: u32) -> Result<Page, DexError>;
    async fn fetch_detail(&self, name: &str) -> Result<EntityDetail, DexError>;
}

#[derive(Clone)]
pub struct PokeApiHttpClient {
    client: Client,
    base_url: String,
}

impl PokeApiHttpClient {
    pub fn new() -> Result<Self, DexError> {
        Self::with_base_url("https://pokeapi.co/api/v2".to_string())
    }

    pub fn with_base_url(base_url: String) -> Result<Self, DexError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("pokedex-client/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| DexError::PokeApiHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| DexError::PokeApiHttp(err.to_string()))?;
        Ok(Self { client, base_url })
    }

    async fn get_json<T>(&self, url: &str, not_found_hint: Option<&str>) -> Result<T, DexError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| DexError::PokeApiHttp(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::NOT_FOUND {
                if let Some(name) = not_found_hint {
                    return Err(DexError::NotFound(name.to_string()));
                }
            }
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "PokeAPI request failed".to_string());
            return Err(DexError::PokeApiStatus {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|err| DexError::PokeApiHttp(err.to_string()))?;
        serde_json::from_str(&body).map_err(|err| DexError::Parse(err.to_string()))
    }
}

#[async_trait]
impl PokeApiClient for PokeApiHttpClient {
    async fn fetch_page(&self, limit: u32, offset: u32) -> Result<Page, DexError> {
        let url = format!("{}/pokemon?limit={limit}&offset={offset}", self.base_url);
        self.get_json(&url, None).await
    }

    async fn fetch_detail(&self, name: &str) -> Result<EntityDetail, DexError> {
        let url = format!("{}/pokemon/{name}", self.base_url);
        let response: DetailResponse = self.get_json(&url, Some(name)).await?;
        response.try_into()
    }
}

// Wire shape of the detail endpoint. Only the fields the domain model needs
// are declared; everything else in the payload is ignored.
#[derive(Debug, Deserialize)]
struct DetailResponse {
    id: u32,
    #[serde(default)]
    order: i32,
    name: String,
    height: u32,
    weight: u32,
    types: Vec<TypeSlot>,
    stats: Vec<StatSlot>,
    sprites: Sprites,
}

#[derive(Debug, Deserialize)]
struct TypeSlot {
    #[serde(rename = "type")]
    type_ref: NamedResource,
}

#[derive(Debug, Deserialize)]
struct StatSlot {
    base_stat: i64,
    stat: NamedResource,
}

#[derive(Debug, Deserialize)]
struct Sprites {
    front_default: Option<String>,
    front_shiny: Option<String>,
    back_default: Option<String>,
    back_shiny: Option<String>,
}

impl TryFrom<DetailResponse> for EntityDetail {
    type Error = DexError;

    fn try_from(response: DetailResponse) -> Result<Self, DexError> {
        if response.stats.is_empty() {
            return Err(DexError::Parse(format!(
                "detail for {} carries no stats",
                response.name
            )));
        }
        if response.types.is_empty() {
            return Err(DexError::Parse(format!(
                "detail for {} carries no types",
                response.name
            )));
        }
        let stats = response
            .stats
            .into_iter()
            .map(|slot| {
                let value = u32::try_from(slot.base_stat).map_err(|_| {
                    DexError::Parse(format!("negative base stat for {}", slot.stat.name))
                })?;
                Ok(Stat {
                    name: slot.stat.name,
                    value,
                })
            })
            .collect::<Result<Vec<_>, DexError>>()?;
        let types = response
            .types
            .into_iter()
            .map(|slot| TypeTag {
                name: slot.type_ref.name,
            })
            .collect();

        Ok(EntityDetail {
            id: response.id,
            order: response.order,
            name: response.name,
            height: response.height,
            weight: response.weight,
            types,
            stats,
            sprites: SpriteSet {
                front_default: response.sprites.front_default,
                front_shiny: response.sprites.front_shiny,
                back_default: response.sprites.back_default,
                back_shiny: response.sprites.back_shiny,
            },
        })
    }
}
