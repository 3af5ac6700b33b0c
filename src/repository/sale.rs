use diesel::dsl::exists;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Nullable, Text};

use crate::{
    domain::{
        ids::{SaleId, TenantId},
        sale::{NewSale, OrderListQuery, OrderStatus, PENDING_PAYMENT_METHOD, Sale, UpdateSale},
    },
    models::sale::{
        NewSale as DbNewSale, OrderFields as DbOrderFields, Sale as DbSale,
        UpdateSale as DbUpdateSale,
    },
    repository::{DieselRepository, RepositoryError, RepositoryResult, SaleReader, SaleWriter},
    schema::vendas,
};

diesel::define_sql_function!(fn btrim(x: Nullable<Text>) -> Nullable<Text>);
diesel::define_sql_function!(fn upper(x: Nullable<Text>) -> Nullable<Text>);

type SalePredicate = Box<dyn BoxableExpression<vendas::table, Pg, SqlType = Nullable<Bool>>>;

/// Rows whose lifecycle stage, as resolved by [`Sale::effective_status`],
/// equals `status`.
///
/// A non-blank `status_pedido` is taken as is. Rows without one derive their
/// stage from the cancelled flag and the payment method.
fn effective_status_is(status: &OrderStatus) -> SalePredicate {
    let stored = || btrim(vendas::status_pedido);
    let explicit = stored()
        .ne("")
        .and(vendas::status_pedido.eq(status.as_str().to_string()));

    let unset = || {
        vendas::status_pedido
            .is_null()
            .nullable()
            .or(stored().eq(""))
    };
    let payment_method = || upper(btrim(vendas::forma_pagamento.nullable()));
    let active = || vendas::cancelada.eq(false).nullable();

    match status {
        OrderStatus::Cancelled => {
            Box::new(explicit.or(unset().and(vendas::cancelada.eq(true).nullable())))
        }
        OrderStatus::Created => Box::new(
            explicit.or(unset()
                .and(active())
                .and(payment_method().eq(PENDING_PAYMENT_METHOD))),
        ),
        OrderStatus::AwaitingPayment => Box::new(
            explicit.or(unset()
                .and(active())
                .and(payment_method().ne(PENDING_PAYMENT_METHOD))),
        ),
        _ => Box::new(explicit),
    }
}

impl SaleReader for DieselRepository {
    fn get_sale_by_id(&self, id: SaleId, tenant_id: TenantId) -> RepositoryResult<Option<Sale>> {
        let mut conn = self.conn()?;
        let sale = vendas::table
            .find(id.get())
            .filter(vendas::tenant_id.eq(tenant_id.get()))
            .first::<DbSale>(&mut conn)
            .optional()?;

        Ok(sale.map(Into::into))
    }

    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Sale>)> {
        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = vendas::table
                .filter(vendas::tenant_id.eq(query.tenant_id.get()))
                .into_boxed::<Pg>();

            if !query.include_cancelled {
                items = items.filter(vendas::cancelada.eq(false));
            }

            if let Some(status) = &query.status {
                items = items.filter(effective_status_is(status));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order((vendas::created_at.desc(), vendas::id.asc()));

        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let db_sales = items.load::<DbSale>(&mut conn)?;

        Ok((total, db_sales.into_iter().map(Into::into).collect()))
    }
}

impl SaleWriter for DieselRepository {
    fn create_sale(&self, new_sale: &NewSale) -> RepositoryResult<Sale> {
        use crate::schema::tenants;

        let mut conn = self.conn()?;

        conn.transaction::<Sale, RepositoryError, _>(|conn| {
            if let Some(tenant_id) = new_sale.tenant_id {
                let tenant_exists = diesel::select(exists(tenants::table.find(tenant_id.get())))
                    .get_result::<bool>(conn)?;
                if !tenant_exists {
                    return Err(RepositoryError::MissingReference("tenant"));
                }
            }

            let db_new = DbNewSale::from(new_sale);

            let created = diesel::insert_into(vendas::table)
                .values(&db_new)
                .get_result::<DbSale>(conn)?;

            Ok(created.into())
        })
    }

    fn update_sale(
        &self,
        id: SaleId,
        tenant_id: TenantId,
        updates: &UpdateSale,
    ) -> RepositoryResult<Sale> {
        let mut conn = self.conn()?;

        conn.transaction::<Sale, RepositoryError, _>(|conn| {
            let target = || {
                vendas::table
                    .filter(vendas::id.eq(id.get()))
                    .filter(vendas::tenant_id.eq(tenant_id.get()))
            };

            // Order attributes are replaced as a unit, before the scalar patch
            // so that an explicit status overrides the one in `order`.
            if let Some(order) = updates.order.as_ref() {
                let fields = DbOrderFields::from(order);
                let changed = diesel::update(target()).set(&fields).execute(conn)?;
                if changed == 0 {
                    return Err(RepositoryError::NotFound);
                }
            }

            let db_updates = DbUpdateSale::from(updates);

            let updated = diesel::update(target())
                .set(&db_updates)
                .get_result::<DbSale>(conn)?;

            Ok(updated.into())
        })
    }
}
