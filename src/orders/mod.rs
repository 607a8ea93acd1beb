pub mod models;

pub use models::{OrderBatch, RemoteOrder, UpdateReport, UpdateRequest};
