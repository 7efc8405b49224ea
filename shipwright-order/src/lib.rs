pub mod error;
pub mod mapper;
pub mod shipping;

pub use error::{MappingError, RequestStage, ShippingError};
pub use mapper::{CreateFulfillmentOrderMapper, RequestMapper};
pub use shipping::{ShippingConfig, ShippingService};
