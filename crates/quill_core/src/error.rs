use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The remote completion service failed (transport, auth, rate limit, bad body).
    #[error("Service error: {0}")]
    Service(String),

    /// A response did not match the expected structure, even after the fallback parse.
    #[error("Format error: {message}: {source}")]
    Format {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// A prompt, topic list or output location could not be read or written.
    #[error("Resource error: {0}")]
    Resource(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_service(&self) -> bool {
        matches!(self, Error::Service(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
