use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ids::{SaleId, TenantId};
use crate::pagination::Pagination;

/// Payment method recorded on sales created before the customer has paid.
pub const PENDING_PAYMENT_METHOD: &str = "PENDENTE_PAGAMENTO";

categorical! {
    /// Fulfillment channel of an order.
    pub enum OrderType {
        /// Placed from a table inside the venue.
        DineIn => "local",
        /// Placed remotely for delivery or pickup.
        Remote => "distancia",
    }
}

categorical! {
    /// Lifecycle stage of an order.
    pub enum OrderStatus {
        /// Order received, payment not requested yet.
        Created => "criado",
        /// Waiting for the customer to pay.
        AwaitingPayment => "aguardando_pagamento",
        /// Payment confirmed.
        Paid => "pago",
        /// Order cancelled.
        Cancelled => "cancelado",
    }
}

categorical! {
    /// How a remote order reaches the customer.
    pub enum DistanceTier {
        /// Delivered to the customer's address.
        Delivery => "entrega",
        /// Collected by the customer.
        Pickup => "retirada",
    }
}

impl OrderStatus {
    /// Whether moving to this status cancels the sale.
    pub fn is_cancellation(&self) -> bool {
        match self {
            Self::Cancelled => true,
            Self::Other(value) => value == "cancelada",
            _ => false,
        }
    }
}

/// Clamp a delivery fee to a finite, non-negative amount.
pub fn normalize_delivery_fee(fee: f64) -> f64 {
    if fee.is_finite() && fee > 0.0 {
        fee
    } else {
        0.0
    }
}

/// Order fulfillment attributes stored on a sale record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderDetails {
    /// Fulfillment channel (`tipo_pedido`).
    pub order_type: Option<OrderType>,
    /// Current lifecycle stage (`status_pedido`).
    pub status: Option<OrderStatus>,
    /// Physical table for dine-in orders (`mesa_id`).
    pub table_id: Option<i32>,
    /// Seat position at the table (`lugar_numero`).
    pub seat_number: Option<i32>,
    /// Delivery or pickup for remote orders (`distancia_tipo`).
    pub distance_tier: Option<DistanceTier>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub delivery_address: Option<String>,
    /// Never null; zero when no fee applies.
    pub delivery_fee: f64,
}

impl OrderDetails {
    /// Details for an order placed from a table.
    pub fn dine_in(table_id: i32, seat_number: i32) -> Self {
        Self {
            order_type: Some(OrderType::DineIn),
            status: Some(OrderStatus::Created),
            table_id: Some(table_id),
            seat_number: Some(seat_number),
            ..Self::default()
        }
    }

    /// Details for a delivery or pickup order awaiting payment.
    pub fn remote(
        distance_tier: DistanceTier,
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
    ) -> Self {
        Self {
            order_type: Some(OrderType::Remote),
            status: Some(OrderStatus::AwaitingPayment),
            distance_tier: Some(distance_tier),
            customer_name: Some(customer_name.into()),
            customer_phone: Some(customer_phone.into()),
            ..Self::default()
        }
    }

    /// Override the lifecycle status.
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach the delivery address.
    pub fn with_delivery_address(mut self, address: impl Into<String>) -> Self {
        self.delivery_address = Some(address.into());
        self
    }

    /// Set the delivery fee; negative or non-finite values are stored as zero.
    pub fn with_delivery_fee(mut self, fee: f64) -> Self {
        self.delivery_fee = normalize_delivery_fee(fee);
        self
    }
}

/// Sale record (`pdv.vendas`) as seen by the order and payment features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub tenant_id: Option<TenantId>,
    /// Operator who registered the sale.
    pub user_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub total: f64,
    pub discount: f64,
    pub payment_method: String,
    pub notes: Option<String>,
    pub cancelled: bool,
    pub order: OrderDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Lifecycle stage of the order, deriving one for sales without an
    /// explicit status.
    pub fn effective_status(&self) -> OrderStatus {
        if let Some(status) = self
            .order
            .status
            .as_ref()
            .filter(|status| !status.as_str().trim().is_empty())
        {
            return status.clone();
        }

        if self.cancelled {
            return OrderStatus::Cancelled;
        }

        if self
            .payment_method
            .trim()
            .eq_ignore_ascii_case(PENDING_PAYMENT_METHOD)
        {
            OrderStatus::Created
        } else {
            OrderStatus::AwaitingPayment
        }
    }

    /// Sale total plus any delivery fee.
    pub fn amount_due(&self) -> f64 {
        self.total + normalize_delivery_fee(self.order.delivery_fee)
    }
}

/// Payload required to insert a sale record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    pub id: SaleId,
    pub tenant_id: Option<TenantId>,
    pub total: f64,
    pub discount: f64,
    pub payment_method: String,
    pub notes: Option<String>,
    pub order: OrderDetails,
}

impl NewSale {
    /// Build a sale payload with no order attributes.
    pub fn new(id: SaleId, total: f64, payment_method: impl Into<String>) -> Self {
        Self {
            id,
            tenant_id: None,
            total,
            discount: 0.0,
            payment_method: payment_method.into(),
            notes: None,
            order: OrderDetails::default(),
        }
    }

    /// Attach the owning tenant.
    pub fn with_tenant(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    /// Attach order fulfillment attributes.
    pub fn with_order(mut self, order: OrderDetails) -> Self {
        self.order = order;
        self
    }

    /// Attach operator or kitchen notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Patch data applied to an existing sale record.
///
/// When both `order` and `order_status` are set, `order_status` wins.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSale {
    pub payment_method: Option<String>,
    pub order_status: Option<OrderStatus>,
    pub cancelled: Option<bool>,
    /// Replaces all order attributes when present.
    pub order: Option<OrderDetails>,
    pub updated_at: DateTime<Utc>,
}

impl Default for UpdateSale {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateSale {
    /// Create a patch with no changes, stamped with the current time.
    pub fn new() -> Self {
        Self {
            payment_method: None,
            order_status: None,
            cancelled: None,
            order: None,
            updated_at: Utc::now(),
        }
    }

    pub fn payment_method(mut self, payment_method: impl Into<String>) -> Self {
        self.payment_method = Some(payment_method.into());
        self
    }

    /// Move the order to `status`; cancellation statuses also flag the sale.
    pub fn order_status(mut self, status: OrderStatus) -> Self {
        if status.is_cancellation() {
            self.cancelled = Some(true);
        }
        self.order_status = Some(status);
        self
    }

    pub fn cancelled(mut self, cancelled: bool) -> Self {
        self.cancelled = Some(cancelled);
        self
    }

    /// Replace every order attribute.
    pub fn order(mut self, order: OrderDetails) -> Self {
        self.order = Some(order);
        self
    }

    /// Whether the patch touches a column besides `updated_at`.
    pub fn is_empty(&self) -> bool {
        self.payment_method.is_none()
            && self.order_status.is_none()
            && self.cancelled.is_none()
            && self.order.is_none()
    }
}

/// Query definition used to list a tenant's orders, newest first.
#[derive(Debug, Clone)]
pub struct OrderListQuery {
    pub tenant_id: TenantId,
    /// Matches the effective status, see [`Sale::effective_status`].
    pub status: Option<OrderStatus>,
    pub include_cancelled: bool,
    pub pagination: Option<Pagination>,
}

impl OrderListQuery {
    /// Construct a query over the non-cancelled sales of `tenant_id`.
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            status: None,
            include_cancelled: false,
            pagination: None,
        }
    }

    /// Filter by stored order status.
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Include cancelled sales in the results.
    pub fn include_cancelled(mut self) -> Self {
        self.include_cancelled = true;
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
