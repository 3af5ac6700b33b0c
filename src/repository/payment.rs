use diesel::dsl::exists;
use diesel::pg::Pg;
use diesel::prelude::*;

use crate::{
    domain::{
        ids::{PaymentId, TenantId},
        payment::{
            NewPaymentTransaction, PaymentListQuery, PaymentStatus, PaymentTransaction,
            UpdatePaymentTransaction,
        },
        sale::{OrderStatus, UpdateSale},
    },
    models::payment::{
        NewPaymentTransaction as DbNewPayment, PaymentTransaction as DbPayment,
        UpdatePaymentTransaction as DbUpdatePayment,
    },
    models::sale::UpdateSale as DbUpdateSale,
    repository::{
        DieselRepository, PaymentReader, PaymentWriter, RepositoryError, RepositoryResult,
    },
};

impl PaymentReader for DieselRepository {
    fn get_payment_by_id(
        &self,
        id: PaymentId,
        tenant_id: TenantId,
    ) -> RepositoryResult<Option<PaymentTransaction>> {
        use crate::schema::payment_transactions;

        let mut conn = self.conn()?;
        let payment = payment_transactions::table
            .find(id.get())
            .filter(payment_transactions::tenant_id.eq(tenant_id.get()))
            .first::<DbPayment>(&mut conn)
            .optional()?;

        Ok(payment.map(Into::into))
    }

    fn list_payments(
        &self,
        query: PaymentListQuery,
    ) -> RepositoryResult<(usize, Vec<PaymentTransaction>)> {
        use crate::schema::payment_transactions;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = payment_transactions::table
                .filter(payment_transactions::tenant_id.eq(query.tenant_id.get()))
                .into_boxed::<Pg>();

            if let Some(sale_id) = query.sale_id {
                items = items.filter(payment_transactions::venda_id.eq(sale_id.get()));
            }

            if let Some(status) = &query.status {
                items = items.filter(payment_transactions::status.eq(status.as_str()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order((
            payment_transactions::created_at.desc(),
            payment_transactions::id.asc(),
        ));

        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let db_payments = items.load::<DbPayment>(&mut conn)?;

        Ok((total, db_payments.into_iter().map(Into::into).collect()))
    }
}

impl PaymentWriter for DieselRepository {
    fn create_payment(
        &self,
        new_payment: &NewPaymentTransaction,
    ) -> RepositoryResult<PaymentTransaction> {
        use crate::schema::{payment_transactions, tenants, vendas};

        let mut conn = self.conn()?;

        conn.transaction::<PaymentTransaction, RepositoryError, _>(|conn| {
            if let Some(tenant_id) = new_payment.tenant_id {
                let tenant_exists = diesel::select(exists(tenants::table.find(tenant_id.get())))
                    .get_result::<bool>(conn)?;
                if !tenant_exists {
                    return Err(RepositoryError::MissingReference("tenant"));
                }
            }

            if let Some(sale_id) = new_payment.sale_id {
                // A tenant-owned payment may only reference that tenant's sales.
                let sale_exists = match new_payment.tenant_id {
                    Some(tenant_id) => diesel::select(exists(
                        vendas::table
                            .find(sale_id.get())
                            .filter(vendas::tenant_id.eq(tenant_id.get())),
                    ))
                    .get_result::<bool>(conn)?,
                    None => diesel::select(exists(vendas::table.find(sale_id.get())))
                        .get_result::<bool>(conn)?,
                };
                if !sale_exists {
                    return Err(RepositoryError::MissingReference("sale"));
                }
            }

            let db_new = DbNewPayment::from(new_payment);

            let created = diesel::insert_into(payment_transactions::table)
                .values(&db_new)
                .get_result::<DbPayment>(conn)?;

            Ok(created.into())
        })
    }

    fn update_payment(
        &self,
        id: PaymentId,
        tenant_id: TenantId,
        updates: &UpdatePaymentTransaction,
    ) -> RepositoryResult<PaymentTransaction> {
        use crate::schema::payment_transactions;

        let mut conn = self.conn()?;
        let db_updates = DbUpdatePayment::from(updates);

        let target = payment_transactions::table
            .filter(payment_transactions::id.eq(id.get()))
            .filter(payment_transactions::tenant_id.eq(tenant_id.get()));

        let updated: PaymentTransaction = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbPayment>(&mut conn)?
            .into();

        Ok(updated)
    }

    fn settle_payment(
        &self,
        id: PaymentId,
        tenant_id: TenantId,
        provider_reference: Option<String>,
    ) -> RepositoryResult<PaymentTransaction> {
        use crate::schema::{payment_transactions, vendas};

        let mut conn = self.conn()?;

        let mut payment_update = UpdatePaymentTransaction::new().status(PaymentStatus::Paid);
        if let Some(reference) = provider_reference {
            payment_update = payment_update.provider_reference(Some(reference));
        }

        conn.transaction::<PaymentTransaction, RepositoryError, _>(|conn| {
            let paid = diesel::update(
                payment_transactions::table
                    .filter(payment_transactions::id.eq(id.get()))
                    .filter(payment_transactions::tenant_id.eq(tenant_id.get())),
            )
            .set(&DbUpdatePayment::from(&payment_update))
            .get_result::<DbPayment>(conn)?;

            if let Some(sale_id) = paid.venda_id {
                let sale_update = UpdateSale::new()
                    .payment_method(paid.provider.to_uppercase())
                    .order_status(OrderStatus::Paid);

                let changed = diesel::update(
                    vendas::table
                        .filter(vendas::id.eq(sale_id))
                        .filter(vendas::tenant_id.eq(tenant_id.get())),
                )
                .set(&DbUpdateSale::from(&sale_update))
                .execute(conn)?;
                if changed == 0 {
                    return Err(RepositoryError::NotFound);
                }
            }

            Ok(paid.into())
        })
    }
}
