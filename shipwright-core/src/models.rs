use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A customer order as loaded from the order source.
///
/// Orders are read-only from the shipper's point of view: nothing here mutates them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub comment: String,
    pub shipping_type_id: u8,
    /// Five newline separated lines: name, street, city, state, country.
    pub shipping_address: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    pub currency: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// A single product line within an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub sku: String,
    pub id: String,
    pub quantity: u32,
    #[serde(default)]
    pub comment: String,
    /// Decimal string, e.g. "19.99"
    pub declared_value: String,
    /// Decimal string, e.g. "24.50"
    pub unit_price: String,
}

/// The person receiving an order.
///
/// Buyer records carry a loose set of attributes depending on where they were captured.
/// The common ones are typed; everything else lands in `extra` and stays reachable by
/// name through [`Buyer::field`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Buyer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Buyer {
    pub fn with_phone(phone: impl Into<String>) -> Self {
        Self {
            phone: Some(phone.into()),
            ..Self::default()
        }
    }

    /// Look up any buyer attribute by its field name
    pub fn field(&self, name: &str) -> Option<serde_json::Value> {
        let typed = match name {
            "name" => self.name.as_ref(),
            "email" => self.email.as_ref(),
            "phone" => self.phone.as_ref(),
            _ => return self.extra.get(name).cloned(),
        };
        typed.map(|v| serde_json::Value::String(v.clone()))
    }

    /// Phone number, if present and not blank
    pub fn phone(&self) -> Option<&str> {
        self.phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buyer_unknown_fields_are_kept() {
        let buyer: Buyer = serde_json::from_value(serde_json::json!({
            "phone": "+1 555 0100",
            "email": "jane@example.com",
            "loyalty_tier": "gold",
            "customer_id": 29664
        }))
        .unwrap();

        assert_eq!(buyer.phone(), Some("+1 555 0100"));
        assert_eq!(buyer.field("email"), Some(serde_json::json!("jane@example.com")));
        assert_eq!(buyer.field("loyalty_tier"), Some(serde_json::json!("gold")));
        assert_eq!(buyer.field("customer_id"), Some(serde_json::json!(29664)));
        assert_eq!(buyer.field("name"), None);
    }

    #[test]
    fn test_blank_phone_counts_as_missing() {
        let buyer = Buyer::with_phone("   ");
        assert_eq!(buyer.phone(), None);
    }

    #[test]
    fn test_order_deserializes_with_optional_fields_missing() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": 16400,
            "created_at": "2024-03-01T10:00:00Z",
            "due_date": "2024-03-08T10:00:00Z",
            "shipping_type_id": 2,
            "shipping_address": "Jane Doe\n1 Main St\nSpringfield\nIL\nUS",
            "currency": "USD"
        }))
        .unwrap();

        assert_eq!(order.id, 16400);
        assert!(order.items.is_empty());
        assert!(order.postal_code.is_none());
        assert_eq!(order.comment, "");
    }
}
