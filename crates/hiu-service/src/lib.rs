//! HIU services built on the gateway correlation engine.
//!
//! - [`consent`]: applies inbound consent notifications to stored consent requests
//! - [`patient`]: patient lookup through the gateway and patient status handling

pub mod consent;
pub mod error;
pub mod patient;

pub use consent::{
    ConsentNotification, ConsentNotificationApplier, ConsentNotificationKind,
    HiuConsentNotificationRequest,
};
pub use error::ConsentError;
pub use patient::{PatientLookupSettings, PatientService, PatientStatusHandler};
