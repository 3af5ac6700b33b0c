use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DEFAULT_CURRENCY;
use crate::domain::ids::{PaymentId, SaleId, TenantId};
use crate::pagination::Pagination;

categorical! {
    /// Lifecycle stage of a payment attempt.
    #[derive(Default)]
    pub enum PaymentStatus {
        /// Initiated, waiting for the provider to confirm.
        #[default]
        Pending => "pending",
        /// Confirmed by the provider.
        Paid => "paid",
        /// Rejected or expired at the provider.
        Failed => "failed",
    }
}

categorical! {
    /// Mobile money provider handling the payment.
    pub enum PaymentProvider {
        Mpesa => "mpesa",
        Emola => "emola",
    }
}

impl PaymentProvider {
    /// Parse user input into a provider accepted at checkout.
    pub fn parse_supported(value: &str) -> Option<Self> {
        match Self::from(value.trim().to_lowercase()) {
            Self::Other(_) => None,
            provider => Some(provider),
        }
    }
}

/// One attempted or completed payment against a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTransaction {
    pub id: PaymentId,
    pub tenant_id: Option<TenantId>,
    pub sale_id: Option<SaleId>,
    pub provider: PaymentProvider,
    /// Number charged through the provider.
    pub phone: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    /// Identifier returned by the provider, used for reconciliation.
    pub provider_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload required to record a new payment attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPaymentTransaction {
    pub id: PaymentId,
    pub tenant_id: Option<TenantId>,
    pub sale_id: Option<SaleId>,
    pub provider: PaymentProvider,
    pub phone: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    pub provider_reference: Option<String>,
}

impl NewPaymentTransaction {
    /// Build a pending payment of zero in the default currency, linked to
    /// nothing.
    pub fn new(id: PaymentId, provider: impl Into<PaymentProvider>) -> Self {
        Self {
            id,
            tenant_id: None,
            sale_id: None,
            provider: provider.into(),
            phone: None,
            amount: 0.0,
            currency: DEFAULT_CURRENCY.to_string(),
            status: PaymentStatus::default(),
            provider_reference: None,
        }
    }

    pub fn with_tenant(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    pub fn with_sale(mut self, sale_id: SaleId) -> Self {
        self.sale_id = Some(sale_id);
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_provider_reference(mut self, reference: impl Into<String>) -> Self {
        self.provider_reference = Some(reference.into());
        self
    }
}

/// Patch data applied when the provider reports progress.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePaymentTransaction {
    pub status: Option<PaymentStatus>,
    /// `Some(None)` clears the stored reference.
    pub provider_reference: Option<Option<String>>,
    pub updated_at: DateTime<Utc>,
}

impl Default for UpdatePaymentTransaction {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdatePaymentTransaction {
    /// Create a patch with no changes, stamped with the current time.
    pub fn new() -> Self {
        Self {
            status: None,
            provider_reference: None,
            updated_at: Utc::now(),
        }
    }

    pub fn status(mut self, status: PaymentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn provider_reference(mut self, reference: Option<impl Into<String>>) -> Self {
        self.provider_reference = Some(reference.map(Into::into));
        self
    }
}

/// Query definition used to list a tenant's payments, newest first.
#[derive(Debug, Clone)]
pub struct PaymentListQuery {
    pub tenant_id: TenantId,
    pub sale_id: Option<SaleId>,
    pub status: Option<PaymentStatus>,
    pub pagination: Option<Pagination>,
}

impl PaymentListQuery {
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            sale_id: None,
            status: None,
            pagination: None,
        }
    }

    /// Only payments made against `sale_id`.
    pub fn sale(mut self, sale_id: SaleId) -> Self {
        self.sale_id = Some(sale_id);
        self
    }

    pub fn status(mut self, status: PaymentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
