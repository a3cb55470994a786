//! Client-side data access layer for a paginated catalog backed by PokeAPI.
//!
//! The crate covers incremental pagination with request deduplication,
//! search-by-name, uniform loading/error surfacing via [`domain::Outcome`],
//! and fire-and-forget dominant-color extraction for themed detail views.
//! Rendering, routing and theming are the host UI shell's business; this
//! library only exposes state snapshots and consumes intents.

pub mod color;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod remote;
pub mod store;

pub use color::{ColorExtractor, PaletteExtractor, Rgb};
pub use domain::{CatalogEntry, EntityDetail, Outcome, Page};
pub use error::DexError;
pub use gateway::Gateway;
pub use remote::{PokeApiClient, PokeApiHttpClient};
pub use store::{CatalogState, CatalogStore, PAGE_SIZE};
