//! Error types for the travel API client.
//!
//! # Design
//! `NotFound` and `Rejected` get dedicated variants: the first is an HTTP
//! 404, the second a well-formed envelope whose `status` is not the success
//! code. Every other non-2xx response lands in `HttpError` with the raw status
//! and body. The state holder collapses all of these into a display string.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, TLS).
    #[error("network error: {0}")]
    Transport(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The envelope carried a status other than the success code.
    #[error("{message}")]
    Rejected { status: i64, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The picked image could not be decoded or re-encoded as JPEG.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The configured base URL is not an absolute http(s) URL.
    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// No signed-in identity, so there is no user id to send.
    #[error("Sign in to manage your travel diary")]
    MissingUser,
}

/// Errors from local files: the preference store and the config file.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
