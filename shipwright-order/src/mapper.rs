use chrono::{DateTime, Utc};
use shipwright_core::fba::{
    Address, CreateFulfillmentOrderItem, CreateFulfillmentOrderRequest, DeliveryWindow,
    FulfillmentAction, Money, ShippingSpeedCategory,
};
use shipwright_core::{Buyer, Order, OrderItem};

use crate::error::MappingError;

/// Number of lines in a shipping address block
pub const ADDRESS_LINES: usize = 5;

/// Turns an order and its buyer into a fulfillment request
pub trait RequestMapper: Send + Sync {
    fn map_to_request(
        &self,
        order: &Order,
        buyer: &Buyer,
    ) -> Result<CreateFulfillmentOrderRequest, MappingError>;
}

/// Maps orders onto the `createFulfillmentOrder` schema.
///
/// Stateless; the only time-dependent field is the delivery window start, which
/// [`CreateFulfillmentOrderMapper::map_at`] takes explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateFulfillmentOrderMapper;

impl CreateFulfillmentOrderMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn map_at(
        &self,
        order: &Order,
        buyer: &Buyer,
        now: DateTime<Utc>,
    ) -> Result<CreateFulfillmentOrderRequest, MappingError> {
        let shipping_speed_category = ShippingSpeedCategory::from_code(order.shipping_type_id)
            .ok_or(MappingError::InvalidShippingSpeed(order.shipping_type_id))?;

        let phone = buyer
            .phone()
            .ok_or_else(|| MappingError::MissingBuyerField("phone".to_string()))?;

        let parts = parse_address(&order.shipping_address)?;
        let order_id = order.id.to_string();

        Ok(CreateFulfillmentOrderRequest {
            seller_fulfillment_order_id: order_id.clone(),
            displayable_order_id: order_id,
            displayable_order_date: order.created_at,
            displayable_order_comment: order.comment.clone(),
            shipping_speed_category,
            delivery_window: DeliveryWindow {
                start_date: now,
                end_date: order.due_date,
            },
            destination_address: parts.into_address(order.postal_code.clone(), phone.to_string()),
            fulfillment_action: FulfillmentAction::Ship,
            items: order
                .items
                .iter()
                .map(|item| map_item(item, &order.currency))
                .collect(),
        })
    }
}

impl RequestMapper for CreateFulfillmentOrderMapper {
    fn map_to_request(
        &self,
        order: &Order,
        buyer: &Buyer,
    ) -> Result<CreateFulfillmentOrderRequest, MappingError> {
        self.map_at(order, buyer, Utc::now())
    }
}

/// Positional parts of a free-text address block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressParts {
    pub name: String,
    pub address_line1: String,
    pub city: String,
    pub state_or_region: String,
    pub country: String,
}

impl AddressParts {
    fn into_address(self, postal_code: Option<String>, phone: String) -> Address {
        Address {
            name: self.name,
            address_line1: self.address_line1,
            city: self.city,
            state_or_region: self.state_or_region,
            country: self.country,
            postal_code,
            phone,
        }
    }
}

/// Split an address block into name, street, city, state and country.
///
/// The block as a whole is trimmed, then split on line breaks (`\n` or `\r\n`). Lines
/// are kept verbatim. Anything other than exactly five lines is rejected.
pub fn parse_address(raw: &str) -> Result<AddressParts, MappingError> {
    let segments: Vec<&str> = raw.trim().lines().collect();

    let &[name, address_line1, city, state_or_region, country] = segments.as_slice() else {
        return Err(MappingError::MalformedAddress {
            expected: ADDRESS_LINES,
            found: segments.len(),
        });
    };

    Ok(AddressParts {
        name: name.to_string(),
        address_line1: address_line1.to_string(),
        city: city.to_string(),
        state_or_region: state_or_region.to_string(),
        country: country.to_string(),
    })
}

fn map_item(item: &OrderItem, currency: &str) -> CreateFulfillmentOrderItem {
    CreateFulfillmentOrderItem {
        seller_sku: item.sku.clone(),
        seller_fulfillment_order_item_id: item.id.clone(),
        quantity: item.quantity,
        displayable_comment: item.comment.clone(),
        per_unit_declared_value: Money {
            currency_code: currency.to_string(),
            value: item.declared_value.clone(),
        },
        per_unit_price: Money {
            currency_code: currency.to_string(),
            value: item.unit_price.clone(),
        },
    }
}
