use async_trait::async_trait;

use crate::models::{Buyer, Order};
use crate::CoreResult;

/// Where orders and buyers come from (database, mock files, ...)
#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn load_order(&self, order_id: u64) -> CoreResult<Order>;

    async fn load_buyer(&self, buyer_id: u64) -> CoreResult<Buyer>;
}
