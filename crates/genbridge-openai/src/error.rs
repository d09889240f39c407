//! Error types for the genbridge-openai crate.

/// Errors produced by the OpenAI plugin.
#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    /// No API key in the config or the environment
    #[error("missing API key: set `api_key` in Config or the {0} environment variable")]
    MissingApiKey(&'static str),

    /// Model is not in the known-capability table and no capabilities were given
    #[error("unknown model {0:?} and no capabilities given")]
    UnknownModel(String),

    /// A vendor role string with no generic counterpart
    #[error("unknown role: {0:?}")]
    UnknownRole(String),

    /// A message part the vendor contract cannot express
    #[error("unknown part type in a request")]
    UnknownPart,

    /// The vendor returned a payload that violates its own contract
    #[error("vendor contract violation: {0}")]
    VendorContract(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error: {0}")]
    Api(String),

    /// JSON serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
