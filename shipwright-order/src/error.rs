use shipwright_core::fba::FulfillmentOrderStatus;
use shipwright_core::CoreError;
use std::fmt;
use std::time::Duration;

/// The order or buyer cannot be expressed as a fulfillment request. Never retried.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("Can not define shippingSpeedCategory for shipping type {0}")]
    InvalidShippingSpeed(u8),

    #[error("Shipping address must have {expected} lines, found {found}")]
    MalformedAddress {
        expected: usize,
        found: usize,
    },

    #[error("Buyer field missing: {0}")]
    MissingBuyerField(String),
}

/// Which call of the workflow failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    Submit,
    Poll,
}

impl fmt::Display for RequestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submit => f.write_str("submit"),
            Self::Poll => f.write_str("poll"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ShippingError {
    #[error("Can not map data to request: {0}")]
    Mapping(#[from] MappingError),

    #[error("Fulfillment API rejected {stage} with status {status}: {body}")]
    Transport {
        stage: RequestStage,
        status: u16,
        body: String,
    },

    #[error("HTTP {stage} request failed: {source}")]
    Http {
        stage: RequestStage,
        #[source]
        source: CoreError,
    },

    #[error("Timeout: order {order_id} still not shipped after {elapsed:?}")]
    Timeout {
        order_id: String,
        elapsed: Duration,
    },

    #[error("Fulfillment order {order_id} ended in status {status}")]
    FulfillmentRejected {
        order_id: String,
        status: FulfillmentOrderStatus,
    },

    #[error("Fulfillment order {order_id} is {status} but carries no tracking number")]
    MissingTrackingData {
        order_id: String,
        status: FulfillmentOrderStatus,
    },

    #[error("Malformed fulfillment API response: {0}")]
    InvalidResponse(#[source] serde_json::Error),

    #[error("Shipping cancelled while waiting for order {order_id}")]
    Cancelled {
        order_id: String,
    },
}

impl ShippingError {
    /// Whether the fulfillment order had already been accepted upstream when this failure
    /// happened. Such an order exists on the provider side even though no tracking number
    /// was returned, and must be reconciled rather than submitted again.
    pub fn order_created(&self) -> bool {
        match self {
            Self::Mapping(_) => false,
            Self::Transport { stage, .. } | Self::Http { stage, .. } => *stage == RequestStage::Poll,
            // Poll responses are the only bodies we decode.
            Self::InvalidResponse(_) => true,
            Self::Timeout { .. }
            | Self::FulfillmentRejected { .. }
            | Self::MissingTrackingData { .. }
            | Self::Cancelled { .. } => true,
        }
    }

    /// Caller input problem rather than an upstream one
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_created_only_after_submission() {
        let mapping = ShippingError::from(MappingError::InvalidShippingSpeed(9));
        assert!(!mapping.order_created());
        assert!(mapping.is_validation());

        let rejected_submit = ShippingError::Transport {
            stage: RequestStage::Submit,
            status: 400,
            body: "bad request".to_string(),
        };
        assert!(!rejected_submit.order_created());

        let failed_poll = ShippingError::Transport {
            stage: RequestStage::Poll,
            status: 503,
            body: String::new(),
        };
        assert!(failed_poll.order_created());

        let timeout = ShippingError::Timeout {
            order_id: "16400".to_string(),
            elapsed: Duration::from_secs(300),
        };
        assert!(timeout.order_created());
        assert!(!timeout.is_validation());
    }

    #[test]
    fn test_transport_error_carries_body() {
        let err = ShippingError::Transport {
            stage: RequestStage::Submit,
            status: 400,
            body: "{\"errors\":[]}".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("400"));
        assert!(message.contains("{\"errors\":[]}"));
    }
}
