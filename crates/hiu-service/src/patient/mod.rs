//! Patient lookup and patient status notifications.

mod service;
mod status;

pub use service::{PatientLookupSettings, PatientService};
pub use status::PatientStatusHandler;
