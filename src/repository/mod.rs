use crate::db::{DbConnection, DbPool};
use crate::domain::ids::{PaymentId, SaleId, TenantId};
use crate::domain::payment::{
    NewPaymentTransaction, PaymentListQuery, PaymentTransaction, UpdatePaymentTransaction,
};
use crate::domain::sale::{NewSale, OrderListQuery, Sale, UpdateSale};

pub use errors::{RepositoryError, RepositoryResult};

pub mod errors;
pub mod payment;
pub mod sale;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over sale records.
pub trait SaleReader {
    fn get_sale_by_id(&self, id: SaleId, tenant_id: TenantId) -> RepositoryResult<Option<Sale>>;
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Sale>)>;
}

/// Write operations over sale records. Sales are never deleted here.
pub trait SaleWriter {
    fn create_sale(&self, new_sale: &NewSale) -> RepositoryResult<Sale>;
    fn update_sale(
        &self,
        id: SaleId,
        tenant_id: TenantId,
        updates: &UpdateSale,
    ) -> RepositoryResult<Sale>;
}

/// Read-only operations over payment transactions.
pub trait PaymentReader {
    fn get_payment_by_id(
        &self,
        id: PaymentId,
        tenant_id: TenantId,
    ) -> RepositoryResult<Option<PaymentTransaction>>;
    fn list_payments(
        &self,
        query: PaymentListQuery,
    ) -> RepositoryResult<(usize, Vec<PaymentTransaction>)>;
}

/// Write operations over payment transactions. Payments are never deleted.
pub trait PaymentWriter {
    fn create_payment(
        &self,
        new_payment: &NewPaymentTransaction,
    ) -> RepositoryResult<PaymentTransaction>;
    fn update_payment(
        &self,
        id: PaymentId,
        tenant_id: TenantId,
        updates: &UpdatePaymentTransaction,
    ) -> RepositoryResult<PaymentTransaction>;
    /// Mark a payment paid and move its linked sale to `pago` in one
    /// transaction. The sale takes the upper-cased provider code as its
    /// payment method. `None` keeps the stored provider reference.
    fn settle_payment(
        &self,
        id: PaymentId,
        tenant_id: TenantId,
        provider_reference: Option<String>,
    ) -> RepositoryResult<PaymentTransaction>;
}
