pub mod models;
pub mod fba;
pub mod http;
pub mod source;
pub mod mock;

pub use models::{Buyer, Order, OrderItem};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use source::OrderSource;
pub use mock::MockHttpClient;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
