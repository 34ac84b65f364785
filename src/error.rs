use thiserror::Error;

/// Errors that abort a whole run before or while producing artifacts.
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    #[error("Failed to read source file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse source file '{path}' as JSON: {message}")]
    Parse { path: String, message: String },

    #[error("Failed to prepare output location '{path}': {message}")]
    Output { path: String, message: String },
}

/// Errors confined to a single node record. The batch continues without that node.
#[derive(Error, Debug, Clone)]
pub enum NodeError {
    #[error("Node record at index {index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("Failed to serialize node '{node}': {message}")]
    Serialize { node: String, message: String },

    #[error("Failed to write node file '{path}': {message}")]
    Write { path: String, message: String },
}

/// Errors raised by the optional classification step. A node that hits one of these
/// is still written, just without its manifest.
#[derive(Error, Debug, Clone)]
pub enum ClassifyError {
    #[error("A non-empty API key is required for classification")]
    AuthenticationError,

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Classification service rate limit reached")]
    RateLimited,

    #[error("Classification service returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Classification service returned no content")]
    EmptyResponse,

    #[error("Classification response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Classification response has no 'ids_manifest' object")]
    MissingManifest,

    #[error("Manifest has no 'role' classification")]
    MissingRole,

    #[error("Manifest role '{0}' is not one of trigger, processor, sink, logic, action, source")]
    UnknownRole(String),
}
