use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::payment::{
    NewPaymentTransaction as DomainNewPayment, PaymentProvider, PaymentStatus,
    PaymentTransaction as DomainPayment, UpdatePaymentTransaction as DomainUpdatePayment,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::payment_transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PaymentTransaction {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tenant_id: Option<Uuid>,
    pub venda_id: Option<Uuid>,
    pub provider: String,
    pub phone: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub provider_reference: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::payment_transactions)]
pub struct NewPaymentTransaction<'a> {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub venda_id: Option<Uuid>,
    pub provider: &'a str,
    pub phone: Option<&'a str>,
    pub amount: f64,
    pub currency: &'a str,
    pub status: &'a str,
    pub provider_reference: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::payment_transactions)]
pub struct UpdatePaymentTransaction<'a> {
    pub status: Option<&'a str>,
    pub provider_reference: Option<Option<&'a str>>,
    pub updated_at: DateTime<Utc>,
}

impl From<PaymentTransaction> for DomainPayment {
    fn from(value: PaymentTransaction) -> Self {
        Self {
            id: value.id.into(),
            tenant_id: value.tenant_id.map(Into::into),
            sale_id: value.venda_id.map(Into::into),
            provider: PaymentProvider::from(value.provider),
            phone: value.phone,
            amount: value.amount,
            currency: value.currency,
            status: PaymentStatus::from(value.status),
            provider_reference: value.provider_reference,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewPayment> for NewPaymentTransaction<'a> {
    fn from(value: &'a DomainNewPayment) -> Self {
        Self {
            id: value.id.get(),
            tenant_id: value.tenant_id.map(|tenant| tenant.get()),
            venda_id: value.sale_id.map(|sale| sale.get()),
            provider: value.provider.as_str(),
            phone: value.phone.as_deref(),
            amount: value.amount,
            currency: value.currency.as_str(),
            status: value.status.as_str(),
            provider_reference: value.provider_reference.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainUpdatePayment> for UpdatePaymentTransaction<'a> {
    fn from(value: &'a DomainUpdatePayment) -> Self {
        Self {
            status: value.status.as_ref().map(PaymentStatus::as_str),
            provider_reference: value
                .provider_reference
                .as_ref()
                .map(|reference| reference.as_deref()),
            updated_at: value.updated_at,
        }
    }
}
