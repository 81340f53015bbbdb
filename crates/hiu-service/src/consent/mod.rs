//! Consent notifications.

mod applier;
mod model;

pub use applier::ConsentNotificationApplier;
pub use model::{ConsentNotification, ConsentNotificationKind, HiuConsentNotificationRequest};
