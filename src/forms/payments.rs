use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::ids::SaleId;
use crate::domain::payment::PaymentProvider;

/// Result type returned by the checkout form helpers.
pub type CheckoutFormResult<T> = Result<T, CheckoutFormError>;

/// Errors that can occur while processing a checkout request.
#[derive(Debug, Error)]
pub enum CheckoutFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("unsupported provider '{0}', use mpesa or emola")]
    UnsupportedProvider(String),
    #[error("invalid sale id '{0}'")]
    InvalidSaleId(String),
}

/// Request to start a mobile money payment for an existing sale.
#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutForm {
    pub sale_id: String,
    #[validate(length(min = 2, max = 20))]
    pub provider: String,
    /// Number that receives the payment prompt.
    #[validate(length(min = 6, max = 30))]
    pub phone: String,
}

/// Checkout request after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub sale_id: SaleId,
    pub provider: PaymentProvider,
    pub phone: String,
}

impl CheckoutForm {
    /// Validates the payload into a [`CheckoutRequest`].
    pub fn into_checkout_request(self) -> CheckoutFormResult<CheckoutRequest> {
        let form = Self {
            sale_id: self.sale_id.trim().to_string(),
            provider: self.provider.trim().to_string(),
            phone: self.phone.trim().to_string(),
        };
        form.validate()?;

        let provider = PaymentProvider::parse_supported(&form.provider)
            .ok_or_else(|| CheckoutFormError::UnsupportedProvider(form.provider.clone()))?;

        let sale_id = form
            .sale_id
            .parse::<SaleId>()
            .map_err(|_| CheckoutFormError::InvalidSaleId(form.sale_id.clone()))?;

        Ok(CheckoutRequest {
            sale_id,
            provider,
            phone: form.phone,
        })
    }
}
