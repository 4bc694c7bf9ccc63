//! Deterministic doubles for exercising the SDK without a network or a
//! real device.

mod platform;
mod transport;

pub use platform::StaticPlatform;
pub use transport::{MockPostResult, MockTransport};
