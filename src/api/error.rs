//! Error types for the API module.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while talking to the MagicPod API or reading its records.
#[derive(Debug, Error, Diagnostic)]
pub enum ApiError {
    /// The service answered with a non-success status.
    #[error("request to {url} failed with status {status} {reason}")]
    #[diagnostic(
        code(magicpod_steps::api::status),
        help("check the API token and the organization and project names")
    )]
    Status {
        /// URL of the failed request.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Status text sent by the server.
        reason: String,
    },

    /// The request never produced a response.
    #[error("request to {url} failed")]
    #[diagnostic(code(magicpod_steps::api::transport))]
    Transport {
        /// URL of the failed request.
        url: String,
        /// Underlying network error.
        #[source]
        source: Box<ureq::Transport>,
    },

    /// The configured base URL cannot be used to build request URLs.
    #[error("invalid API URL '{url}': {reason}")]
    #[diagnostic(code(magicpod_steps::api::invalid_url))]
    InvalidUrl {
        /// Offending URL text.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The response body is not the JSON the client expected.
    #[error("response from {url} is not valid JSON")]
    #[diagnostic(code(magicpod_steps::api::decode))]
    Decode {
        /// URL of the request.
        url: String,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },

    /// A listing page did not advance past the requested cursor.
    #[error(
        "{collection} listing did not advance: page requested from {cursor} ended at {last_number}"
    )]
    #[diagnostic(
        code(magicpod_steps::api::stalled_pagination),
        help("the listing endpoint must honour its `min_*_number` cursor parameter")
    )]
    StalledPagination {
        /// Singular noun of the listed collection.
        collection: &'static str,
        /// Minimum number the page was requested from.
        cursor: u64,
        /// Number of the page's last record.
        last_number: u64,
    },

    /// A record lacks a field the pipeline relies on.
    #[error("{record} has no usable `{field}` field")]
    #[diagnostic(code(magicpod_steps::api::missing_field))]
    MissingField {
        /// Description of the record, such as `test case 3`.
        record: String,
        /// Name of the missing field.
        field: &'static str,
    },
}
