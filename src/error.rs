use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum DexError {
    #[error("PokeAPI request failed: {0}")]
    PokeApiHttp(String),

    #[error("PokeAPI returned status {status}: {message}")]
    PokeApiStatus { status: u16, message: String },

    #[error("entity not found: {0}")]
    NotFound(String),

    #[error("failed to parse PokeAPI response: {0}")]
    Parse(String),

    #[error("entry url has no trailing numeric id: {0}")]
    InvalidEntryUrl(String),
}
