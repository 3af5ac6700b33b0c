use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::sale::{DistanceTier, OrderDetails, OrderStatus};
use crate::forms::sanitize_inline_text;

/// Result type returned by the order form helpers.
pub type OrderFormResult<T> = Result<T, OrderFormError>;

/// Errors that can occur while processing order forms.
#[derive(Debug, Error)]
pub enum OrderFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("unsupported order kind '{0}', use entrega or retirada")]
    UnsupportedKind(String),
    #[error("delivery address is required for delivery orders")]
    MissingAddress,
    #[error("order status cannot be empty")]
    EmptyStatus,
}

/// Details of an order placed remotely for delivery or pickup.
#[derive(Debug, Deserialize, Validate)]
pub struct RemoteOrderForm {
    /// `entrega` or `retirada`.
    #[validate(length(min = 3, max = 20))]
    pub kind: String,
    #[validate(length(min = 2, max = 100))]
    pub customer_name: String,
    #[validate(length(min = 6, max = 30))]
    pub customer_phone: String,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub delivery_fee: f64,
}

impl RemoteOrderForm {
    /// Validates the payload into order attributes for a remote sale.
    pub fn into_order_details(self) -> OrderFormResult<OrderDetails> {
        let form = Self {
            kind: self.kind.trim().to_lowercase(),
            customer_name: sanitize_inline_text(&self.customer_name),
            customer_phone: self.customer_phone.trim().to_string(),
            ..self
        };
        form.validate()?;

        let tier = match DistanceTier::from(form.kind) {
            DistanceTier::Other(kind) => return Err(OrderFormError::UnsupportedKind(kind)),
            tier => tier,
        };

        let address = form
            .delivery_address
            .as_deref()
            .map(sanitize_inline_text)
            .filter(|address| !address.is_empty());

        if tier == DistanceTier::Delivery && address.is_none() {
            return Err(OrderFormError::MissingAddress);
        }

        let mut details = OrderDetails::remote(tier, form.customer_name, form.customer_phone)
            .with_delivery_fee(form.delivery_fee);

        if let Some(address) = address {
            details = details.with_delivery_address(address);
        }

        Ok(details)
    }
}

/// Order placed from a table inside the venue.
#[derive(Debug, Deserialize, Validate)]
pub struct DineInOrderForm {
    #[validate(range(min = 1))]
    pub table_id: i32,
    #[serde(default = "default_seat")]
    #[validate(range(min = 1))]
    pub seat_number: i32,
}

fn default_seat() -> i32 {
    1
}

impl DineInOrderForm {
    pub fn into_order_details(self) -> OrderFormResult<OrderDetails> {
        self.validate()?;
        Ok(OrderDetails::dine_in(self.table_id, self.seat_number))
    }
}

/// Request to move an order to a new lifecycle stage.
#[derive(Debug, Deserialize, Validate)]
pub struct OrderStatusForm {
    #[validate(length(max = 30))]
    pub status: String,
}

impl OrderStatusForm {
    /// Normalizes the requested status. Values outside the known set are kept
    /// as-is so venues can use their own stages.
    pub fn into_order_status(self) -> OrderFormResult<OrderStatus> {
        self.validate()?;

        let status = self.status.trim().to_lowercase();
        if status.is_empty() {
            return Err(OrderFormError::EmptyStatus);
        }

        Ok(OrderStatus::from(status))
    }
}
