use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectXError {
    /// A required identifier or option is empty or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The cookie endpoint could not be reached while initializing.
    #[error("Initialization network error: {0}")]
    InitializationNetwork(#[source] BoxedError),
    /// Caller data could not be converted to JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Caller data converted to JSON but not to the shape the endpoint
    /// expects (e.g. tracking fields that are not an object).
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
    /// The collection service answered with a non-success status code.
    #[error("Delivery error: {1} (Status {0})")]
    Delivery(reqwest::StatusCode, String),
    /// The request could not be sent or the connection failed.
    #[error("Network error: {0}")]
    Network(#[source] BoxedError),
}

impl From<reqwest::Error> for ConnectXError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(Box::new(error))
    }
}

impl ConnectXError {
    /// Build a `Network` error from a plain message, mostly useful for
    /// transport doubles.
    pub fn network(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::Network(message.into())
    }
}

pub type ConnectXResult<T> = Result<T, ConnectXError>;

pub(crate) type BoxedError = Box<dyn std::error::Error + Send + Sync>;
