pub mod auth;
pub mod validation;

pub use auth::require_api_key;
pub use validation::parse_order_batch;
