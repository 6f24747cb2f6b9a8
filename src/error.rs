use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The page doesn't have the expected table shape, nothing matched: {0}")]
    StructuralMismatch(String),
    #[error("Couldn't parse the selector: {0}")]
    InvalidSelector(String),

    #[error("Fetched more/less countries than rates. Countries: {names}, rates: {rates}")]
    RowCountMismatch { names: usize, rates: usize },
    #[error("Got invalid country {0:?}")]
    UnrecognizedCountry(String),
    #[error("Couldn't parse rate {0:?} as a number")]
    RateParse(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
