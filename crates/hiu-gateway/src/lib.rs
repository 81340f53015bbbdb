//! Asynchronous gateway exchange for the HIU.
//!
//! Requests leave through a [`GatewayClient`]; their answers come back later on
//! an independent inbound call and are fed to a [`CallbackHandler`]. The
//! [`Correlator`] joins the two legs by correlation id.

pub mod callback;
pub mod client;
pub mod correlator;
pub mod error;
pub mod types;

pub use callback::CallbackHandler;
pub use client::{GatewayClient, HttpGatewayClient, OutboundMessage, ROUTING_HEADER};
pub use correlator::{Correlator, RoutedMessage};
pub use error::{GatewayError, RemoteError, RemoteErrorKind};
pub use types::*;
