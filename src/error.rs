use bytes::Bytes;
use reqwest::StatusCode;
use thiserror::Error;

/// All different error types this crate uses.
#[derive(Error, Debug)]
pub enum SpotlightError {
    /// The language code names no supported language model.
    #[error("Unsupported language `{code}`, please enter either sv or en as language")]
    UnsupportedLanguage {
        /// The rejected language code.
        code: String,
    },
    /// None of the visited pages produced a single usable token.
    #[error("Extraction produced no usable content")]
    EmptyCorpus,
    /// The start url could not be parsed.
    #[error("Invalid url `{url}`: {source}")]
    InvalidUrl {
        /// The rejected input.
        url: String,
        /// Why the url was rejected.
        source: url::ParseError,
    },
    /// Received a response that was not `200 OK`.
    #[error("Expected 200 OK but got: {status}")]
    NoHttpSuccess {
        /// Statuscode of the response.
        status: StatusCode,
    },
    /// Failed to get a response.
    #[error("Request failed: {error}")]
    HttpRequestFailure {
        /// The reqwest error.
        error: reqwest::Error,
    },
    /// Failed to read a document.
    #[error("Failed to read document of {} bytes", body.len())]
    ReadDocument {
        /// The content that resulted in the error.
        body: Bytes,
    },
}
