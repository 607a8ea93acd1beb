pub mod auth;
pub mod client;
pub mod error;
pub mod traits;

pub use client::Cin7Client;
pub use error::UpstreamError;
pub use traits::FulfillmentPlatform;
