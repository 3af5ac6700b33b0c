use mockall::mock;

use super::{PaymentReader, PaymentWriter, RepositoryResult, SaleReader, SaleWriter};
use crate::domain::{
    ids::{PaymentId, SaleId, TenantId},
    payment::{
        NewPaymentTransaction, PaymentListQuery, PaymentTransaction, UpdatePaymentTransaction,
    },
    sale::{NewSale, OrderListQuery, Sale, UpdateSale},
};

mock! {
    pub SaleReader {}

    impl SaleReader for SaleReader {
        fn get_sale_by_id(&self, id: SaleId, tenant_id: TenantId) -> RepositoryResult<Option<Sale>>;
        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Sale>)>;
    }
}

mock! {
    pub SaleWriter {}

    impl SaleWriter for SaleWriter {
        fn create_sale(&self, new_sale: &NewSale) -> RepositoryResult<Sale>;
        fn update_sale(&self, id: SaleId, tenant_id: TenantId, updates: &UpdateSale) -> RepositoryResult<Sale>;
    }
}

mock! {
    pub PaymentReader {}

    impl PaymentReader for PaymentReader {
        fn get_payment_by_id(&self, id: PaymentId, tenant_id: TenantId) -> RepositoryResult<Option<PaymentTransaction>>;
        fn list_payments(&self, query: PaymentListQuery) -> RepositoryResult<(usize, Vec<PaymentTransaction>)>;
    }
}

mock! {
    pub PaymentWriter {}

    impl PaymentWriter for PaymentWriter {
        fn create_payment(&self, new_payment: &NewPaymentTransaction) -> RepositoryResult<PaymentTransaction>;
        fn update_payment(&self, id: PaymentId, tenant_id: TenantId, updates: &UpdatePaymentTransaction) -> RepositoryResult<PaymentTransaction>;
        fn settle_payment(&self, id: PaymentId, tenant_id: TenantId, provider_reference: Option<String>) -> RepositoryResult<PaymentTransaction>;
    }
}

// Services that combine sale and payment access need one object implementing
// every trait.
mock! {
    pub Store {}

    impl SaleReader for Store {
        fn get_sale_by_id(&self, id: SaleId, tenant_id: TenantId) -> RepositoryResult<Option<Sale>>;
        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Sale>)>;
    }

    impl SaleWriter for Store {
        fn create_sale(&self, new_sale: &NewSale) -> RepositoryResult<Sale>;
        fn update_sale(&self, id: SaleId, tenant_id: TenantId, updates: &UpdateSale) -> RepositoryResult<Sale>;
    }

    impl PaymentReader for Store {
        fn get_payment_by_id(&self, id: PaymentId, tenant_id: TenantId) -> RepositoryResult<Option<PaymentTransaction>>;
        fn list_payments(&self, query: PaymentListQuery) -> RepositoryResult<(usize, Vec<PaymentTransaction>)>;
    }

    impl PaymentWriter for Store {
        fn create_payment(&self, new_payment: &NewPaymentTransaction) -> RepositoryResult<PaymentTransaction>;
        fn update_payment(&self, id: PaymentId, tenant_id: TenantId, updates: &UpdatePaymentTransaction) -> RepositoryResult<PaymentTransaction>;
        fn settle_payment(&self, id: PaymentId, tenant_id: TenantId, provider_reference: Option<String>) -> RepositoryResult<PaymentTransaction>;
    }
}
