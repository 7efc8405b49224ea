use shipwright_core::fba::{
    fulfillment_order_path, CreateFulfillmentOrderRequest, Envelope, FulfillmentOrderStatus,
    GetFulfillmentOrderResponse, GetFulfillmentOrderResult, FULFILLMENT_ORDERS_PATH,
};
use shipwright_core::{Buyer, HttpClient, HttpRequest, HttpResponse, Order};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::{RequestStage, ShippingError};
use crate::mapper::RequestMapper;

const HTTP_OK: u16 = 200;

/// Polling cadence and overall budget for a single `ship` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingConfig {
    pub poll_interval: Duration,
    /// Measured from the start of submission
    pub max_duration: Duration,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_duration: Duration::from_secs(5 * 60),
        }
    }
}

/// Submits fulfillment orders and waits for their tracking number.
///
/// Holds no per-call state, so one service can be shared by concurrent `ship` calls.
pub struct ShippingService {
    client: Arc<dyn HttpClient>,
    mapper: Arc<dyn RequestMapper>,
    config: ShippingConfig,
}

impl ShippingService {
    pub fn new(
        client: Arc<dyn HttpClient>,
        mapper: Arc<dyn RequestMapper>,
        config: ShippingConfig,
    ) -> Self {
        Self {
            client,
            mapper,
            config,
        }
    }

    /// Create a fulfillment order for `order` and wait until it has a tracking number.
    ///
    /// Exactly one fulfillment order is created per call. Failures after a successful
    /// submission leave that order in place upstream; see [`ShippingError::order_created`].
    pub async fn ship(&self, order: &Order, buyer: &Buyer) -> Result<String, ShippingError> {
        self.ship_with_cancellation(order, buyer, &CancellationToken::new())
            .await
    }

    /// Same as [`ShippingService::ship`], but stops waiting as soon as `cancel` fires
    #[tracing::instrument(skip_all, fields(order_id = order.id))]
    pub async fn ship_with_cancellation(
        &self,
        order: &Order,
        buyer: &Buyer,
        cancel: &CancellationToken,
    ) -> Result<String, ShippingError> {
        let request = self.mapper.map_to_request(order, buyer)?;
        let order_id = request.seller_fulfillment_order_id.clone();

        let started = Instant::now();
        let deadline = started + self.config.max_duration;
        self.create_fulfillment_order(request).await?;
        info!(order_id = %order_id, "Fulfillment order submitted");

        let mut attempt: u32 = 0;
        loop {
            if Instant::now() >= deadline {
                return Err(timed_out(&order_id, started, attempt));
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(&order_id, attempt)),
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }

            attempt += 1;
            // An in-flight status request still yields to cancellation and the deadline.
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(&order_id, attempt)),
                result = self.get_fulfillment_order(&order_id) => result?,
                _ = tokio::time::sleep_until(deadline) => {
                    return Err(timed_out(&order_id, started, attempt));
                }
            };
            debug!(order_id = %order_id, attempt, status = %result.status(), "Polled fulfillment order");

            if let Some(tracking_number) = check_progress(&order_id, &result)? {
                info!(
                    order_id = %order_id,
                    attempts = attempt,
                    tracking_number = %tracking_number,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Fulfillment order shipped"
                );
                return Ok(tracking_number);
            }
        }
    }

    async fn create_fulfillment_order(
        &self,
        request: CreateFulfillmentOrderRequest,
    ) -> Result<(), ShippingError> {
        let body = serde_json::to_string(&Envelope { body: request }).map_err(|e| {
            ShippingError::Http {
                stage: RequestStage::Submit,
                source: e.into(),
            }
        })?;

        let http_request = HttpRequest::post_json(FULFILLMENT_ORDERS_PATH, body);
        self.send(&http_request, RequestStage::Submit).await?;
        Ok(())
    }

    async fn get_fulfillment_order(
        &self,
        order_id: &str,
    ) -> Result<GetFulfillmentOrderResult, ShippingError> {
        let http_request = HttpRequest::get(fulfillment_order_path(order_id));
        let response = self.send(&http_request, RequestStage::Poll).await?;

        let parsed: GetFulfillmentOrderResponse =
            serde_json::from_str(&response.body).map_err(ShippingError::InvalidResponse)?;
        Ok(parsed.payload)
    }

    /// Execute a request, treating anything but 200 as fatal
    async fn send(
        &self,
        request: &HttpRequest,
        stage: RequestStage,
    ) -> Result<HttpResponse, ShippingError> {
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|source| ShippingError::Http { stage, source })?;

        if response.status != HTTP_OK {
            error!(
                method = %request.method,
                path = %request.path,
                status = response.status,
                body = %response.body,
                "Fulfillment API returned an error"
            );
            return Err(ShippingError::Transport {
                stage,
                status: response.status,
                body: response.body,
            });
        }

        Ok(response)
    }
}

fn timed_out(order_id: &str, started: Instant, attempts: u32) -> ShippingError {
    let elapsed = started.elapsed();
    warn!(order_id = %order_id, attempts, elapsed_ms = elapsed.as_millis() as u64, "Gave up waiting for tracking number");
    ShippingError::Timeout {
        order_id: order_id.to_string(),
        elapsed,
    }
}

fn cancelled(order_id: &str, attempts: u32) -> ShippingError {
    info!(order_id = %order_id, attempts, "Shipping cancelled");
    ShippingError::Cancelled {
        order_id: order_id.to_string(),
    }
}

/// Decide what a status response means for the wait.
///
/// `Ok(Some(_))` when a tracking number is available, `Ok(None)` to keep polling.
fn check_progress(
    order_id: &str,
    result: &GetFulfillmentOrderResult,
) -> Result<Option<String>, ShippingError> {
    let status = result.status();
    match status {
        FulfillmentOrderStatus::New
        | FulfillmentOrderStatus::Received
        | FulfillmentOrderStatus::Planning => Ok(None),

        // Packages may not be assigned yet when picking starts.
        FulfillmentOrderStatus::Processing => Ok(result.tracking_number().map(str::to_string)),

        FulfillmentOrderStatus::Complete | FulfillmentOrderStatus::CompletePartialled => result
            .tracking_number()
            .map(|t| Some(t.to_string()))
            .ok_or_else(|| ShippingError::MissingTrackingData {
                order_id: order_id.to_string(),
                status: status.clone(),
            }),

        FulfillmentOrderStatus::Cancelled
        | FulfillmentOrderStatus::Unfulfillable
        | FulfillmentOrderStatus::Invalid => Err(ShippingError::FulfillmentRejected {
            order_id: order_id.to_string(),
            status: status.clone(),
        }),

        FulfillmentOrderStatus::Other(raw) => {
            warn!(order_id = %order_id, status = %raw, "Unknown fulfillment order status, still waiting");
            Ok(None)
        }
    }
}
