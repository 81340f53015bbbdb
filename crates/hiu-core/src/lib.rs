pub mod error;
pub mod id;
pub mod time;

pub use error::{CoreError, Result};
pub use id::{CorrelationId, generate_request_id, routing_suffix};
pub use time::GatewayTimestamp;
