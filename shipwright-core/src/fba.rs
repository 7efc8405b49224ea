use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base path of the Fulfillment Outbound API (2020-07-01)
pub const FULFILLMENT_ORDERS_PATH: &str = "/fba/outbound/2020-07-01/fulfillmentOrders/";

/// Path of a single fulfillment order. Joined with a single `/`; the doubled slash some
/// clients send is not part of the documented route.
pub fn fulfillment_order_path(seller_fulfillment_order_id: &str) -> String {
    format!("{}{}", FULFILLMENT_ORDERS_PATH, seller_fulfillment_order_id)
}

// ============================================================================
// createFulfillmentOrder
// ============================================================================

/// Every request body is wrapped in a `{"body": ...}` envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    pub body: T,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateFulfillmentOrderRequest {
    pub seller_fulfillment_order_id: String,
    pub displayable_order_id: String,
    #[serde(with = "zulu")]
    pub displayable_order_date: DateTime<Utc>,
    pub displayable_order_comment: String,
    pub shipping_speed_category: ShippingSpeedCategory,
    pub delivery_window: DeliveryWindow,
    pub destination_address: Address,
    pub fulfillment_action: FulfillmentAction,
    pub items: Vec<CreateFulfillmentOrderItem>,
}

/// Delivery-speed tier. The numeric codes are the shipping type ids used by the order system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ShippingSpeedCategory {
    Standard,
    Expedited,
    Priority,
    ScheduledDelivery,
}

impl ShippingSpeedCategory {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Standard),
            2 => Some(Self::Expedited),
            3 => Some(Self::Priority),
            4 => Some(Self::ScheduledDelivery),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Standard => 1,
            Self::Expedited => 2,
            Self::Priority => 3,
            Self::ScheduledDelivery => 4,
        }
    }
}

/// `Hold` is not valid together with `ScheduledDelivery`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FulfillmentAction {
    Ship,
    Hold,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryWindow {
    #[serde(with = "zulu")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "zulu")]
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub name: String,
    pub address_line1: String,
    pub city: String,
    pub state_or_region: String,
    /// ISO 3166-1 alpha-2
    #[serde(rename = "countryCode")]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateFulfillmentOrderItem {
    pub seller_sku: String,
    pub seller_fulfillment_order_item_id: String,
    pub quantity: u32,
    pub displayable_comment: String,
    pub per_unit_declared_value: Money,
    pub per_unit_price: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub currency_code: String,
    pub value: String,
}

// ============================================================================
// getFulfillmentOrder
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetFulfillmentOrderResponse {
    pub payload: GetFulfillmentOrderResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFulfillmentOrderResult {
    pub fulfillment_order: FulfillmentOrder,
    #[serde(default)]
    pub fulfillment_shipments: Option<Vec<FulfillmentShipment>>,
}

impl GetFulfillmentOrderResult {
    pub fn status(&self) -> &FulfillmentOrderStatus {
        &self.fulfillment_order.fulfillment_order_status
    }

    /// First tracking number found, walking shipments and their packages in order
    pub fn tracking_number(&self) -> Option<&str> {
        self.fulfillment_shipments
            .iter()
            .flatten()
            .flat_map(|s| s.fulfillment_shipment_package.iter().flatten())
            .filter_map(|p| p.tracking_number.as_deref())
            .find(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentOrder {
    pub fulfillment_order_status: FulfillmentOrderStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentShipment {
    #[serde(default)]
    pub fulfillment_shipment_package: Option<Vec<FulfillmentShipmentPackage>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentShipmentPackage {
    #[serde(default)]
    pub tracking_number: Option<String>,
}

/// Status reported for a fulfillment order.
///
/// The API may grow new values, so anything unrecognised is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FulfillmentOrderStatus {
    New,
    Received,
    Planning,
    Processing,
    Complete,
    CompletePartialled,
    Cancelled,
    Unfulfillable,
    Invalid,
    Other(String),
}

impl FulfillmentOrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "New",
            Self::Received => "Received",
            Self::Planning => "Planning",
            Self::Processing => "Processing",
            Self::Complete => "Complete",
            Self::CompletePartialled => "CompletePartialled",
            Self::Cancelled => "Cancelled",
            Self::Unfulfillable => "Unfulfillable",
            Self::Invalid => "Invalid",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for FulfillmentOrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "New" => Self::New,
            "Received" => Self::Received,
            "Planning" => Self::Planning,
            "Processing" => Self::Processing,
            "Complete" => Self::Complete,
            "CompletePartialled" => Self::CompletePartialled,
            "Cancelled" => Self::Cancelled,
            "Unfulfillable" => Self::Unfulfillable,
            "Invalid" => Self::Invalid,
            _ => Self::Other(value),
        }
    }
}

impl From<FulfillmentOrderStatus> for String {
    fn from(value: FulfillmentOrderStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for FulfillmentOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RFC 3339 timestamps in UTC with a `Z` suffix and whole seconds
pub mod zulu {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
