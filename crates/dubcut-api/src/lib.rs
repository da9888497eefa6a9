// crates/dubcut-api/src/lib.rs
//
// Backend access layer for dubcut. Owns the REST client, the request
// worker, and the scheduling primitives the UI drives them with. Everything
// here is egui-free; dubcut-ui consumes it through BackendWorker's channel.
//
// To add a new backend operation: give BackendClient a method for the
// request, an ApiResult variant for its outcome, and a BackendWorker method
// that spawns it.

pub mod client;
pub mod error;
pub mod schedule;
pub mod types;
pub mod waveform;
pub mod worker;

pub use client::BackendClient;
pub use error::ApiError;
pub use schedule::{Debounce, Poller};
pub use types::{ApiResult, BulkOp, PinRequest};
pub use worker::BackendWorker;
