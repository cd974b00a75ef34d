// ABOUTME: Delivery platform client: trait seam, HTTP implementation, throttling.
// ABOUTME: All network I/O against the external template store lives here.

mod error;
mod http;
mod store;
mod throttle;

pub use error::{ApiErrorKind, ExternalApiError};
pub use http::{HttpTemplateStore, StoreConfig};
pub use store::{
    TemplatePayload, TemplateRecord, TemplateStore, UpsertAction, UpsertOutcome, upsert_by_name,
};
pub use throttle::{FixedDelay, NoDelay, Throttle};
