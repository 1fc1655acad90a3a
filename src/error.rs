//! Error taxonomy shared by the relay endpoint and the widget client.

use thiserror::Error;

/// Every way a send can fail. The user only ever sees one localized
/// fallback string; the variant detail is for operator logs.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid or missing token")]
    Auth,

    #[error("message empty after sanitization")]
    Validation,

    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("unexpected failure: {0}")]
    Unknown(String),
}
