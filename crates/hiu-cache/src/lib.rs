//! Cache layer for the HIU gateway engine.
//!
//! ## Caches
//!
//! - **Result cache**: business key (patient id) → last resolved value
//! - **Correlation cache**: correlation id → gateway reply, single use
//!
//! Both are instances of [`LocalCache`] behind the [`CacheAdapter`] contract,
//! injected as trait objects so tests can substitute their own.
//!
//! ## Waiting
//!
//! ```text
//! requester ──subscribe──▶ LocalCache ◀──put── callback handler
//!     │                        │
//!     └──get (race check)──────┘
//!     └──recv written keys until match or deadline
//! ```

pub mod adapter;
pub mod local;
pub mod watch;

pub use adapter::{CacheAdapter, CacheStats, ObservableCache};
pub use local::LocalCache;
pub use watch::wait_for_entry;
