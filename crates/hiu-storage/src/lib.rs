//! # hiu-storage
//!
//! Persistence contract for consent requests.
//!
//! The engine only needs key-based access, so the contract is the small
//! [`ConsentRepository`] trait. [`InMemoryConsentRepository`] is the backend
//! used by the server binary and by tests.

mod error;
mod memory;
mod traits;
mod types;

pub use error::StorageError;
pub use memory::InMemoryConsentRepository;
pub use traits::ConsentRepository;
pub use types::{ConsentRequest, ConsentStatus};

