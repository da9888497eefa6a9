// crates/dubcut-api/src/error.rs
//
// The public error taxonomy for everything that crosses the wire.
//
// Handling policy (enforced by AppContext::ingest_results):
//   Network   — dismissable notice, never auto-retried (bulk mutations are
//               not idempotent against double-application at the transport
//               layer, so retries must be user-initiated).
//   Capacity  — inline notice with 3 s auto-dismiss; local state untouched.
//   NotFound  — timeline missing: error view with a path back.
//   Cancelled — a superseded card lookup; silently discarded.
//   Backend   — any other non-2xx.
//
// Local validation conditions (seek/trim out of range) never reach this
// type — they are absorbed by clamping in dubcut-core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("pin limit reached for this segment")]
    Capacity,

    #[error("not found")]
    NotFound,

    #[error("request superseded")]
    Cancelled,

    #[error("backend returned {status}: {msg}")]
    Backend { status: u16, msg: String },
}

impl From<ureq::Error> for ApiError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(404, _) => ApiError::NotFound,
            ureq::Error::Status(409, _) => ApiError::Capacity,
            ureq::Error::Status(status, resp) => ApiError::Backend {
                status,
                msg: resp.status_text().to_string(),
            },
            ureq::Error::Transport(t) => ApiError::Network(t.to_string()),
        }
    }
}

impl From<std::io::Error> for ApiError {
    // into_json failures — a malformed body is a transport-level problem
    // from the UI's point of view.
    fn from(e: std::io::Error) -> Self {
        ApiError::Network(format!("response decode: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_taxonomy() {
        let cap: ApiError = ureq::Error::Status(
            409,
            ureq::Response::new(409, "Conflict", "").unwrap(),
        )
        .into();
        assert!(matches!(cap, ApiError::Capacity));

        let missing: ApiError = ureq::Error::Status(
            404,
            ureq::Response::new(404, "Not Found", "").unwrap(),
        )
        .into();
        assert!(matches!(missing, ApiError::NotFound));

        let other: ApiError = ureq::Error::Status(
            500,
            ureq::Response::new(500, "Internal Server Error", "").unwrap(),
        )
        .into();
        assert!(matches!(other, ApiError::Backend { status: 500, .. }));
    }
}
