use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Broken serving configuration. Fatal at startup, never raised while
    /// handling a request.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A request that the serving layer refuses to run, e.g. a facet on a
    /// field that is not filterable. The front door formats this for clients.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The document backend could not be reached or answered with an error.
    /// Propagated unmodified; retry policy lives outside this core.
    #[error("Search backend unavailable: {0}")]
    BackendUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
