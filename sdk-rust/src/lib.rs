mod client;
mod config;
mod context;
pub mod envelope;
mod errors;
mod opentelemetry;
pub mod platform;
mod transport;

pub mod connectx_test;

pub use client::{ConnectX, ConnectXBuilder};
pub use config::{api_root, ConnectXOptions};
pub use context::ClientContext;
pub use envelope::{IdentifyPayload, JsonObject, OpenTicketPayload};
pub use errors::*;
pub use transport::{HttpTransport, PostRequest, Transport};
