use serde::Deserialize;

use crate::domain::ids::{SaleId, TenantId};
use crate::domain::sale::{OrderListQuery, OrderStatus, Sale, UpdateSale};
use crate::forms::orders::{DineInOrderForm, OrderStatusForm, RemoteOrderForm};
use crate::repository::{SaleReader, SaleWriter};
use crate::services::{ServiceError, ServiceResult};

/// Number of orders returned when the caller does not ask for a limit.
pub const DEFAULT_ORDERS_LIMIT: usize = 200;

/// Largest number of orders returned by one listing.
pub const MAX_ORDERS_LIMIT: usize = 500;

/// Query parameters accepted when listing orders.
#[derive(Debug, Default, Deserialize)]
pub struct OrderQuery {
    /// Only orders currently in this stage.
    pub status: Option<String>,
    #[serde(default)]
    pub include_cancelled: bool,
    pub limit: Option<usize>,
}

/// Orders returned for a listing together with the unpaged total.
#[derive(Debug)]
pub struct OrdersPage {
    pub orders: Vec<Sale>,
    pub total: usize,
}

/// Lists the most recent orders of a tenant.
pub fn list_orders<R>(repo: &R, tenant_id: TenantId, query: OrderQuery) -> ServiceResult<OrdersPage>
where
    R: SaleReader + ?Sized,
{
    let OrderQuery {
        status,
        include_cancelled,
        limit,
    } = query;
    let limit = limit
        .unwrap_or(DEFAULT_ORDERS_LIMIT)
        .clamp(1, MAX_ORDERS_LIMIT);

    let mut list_query = OrderListQuery::new(tenant_id).paginate(1, limit);

    if let Some(status) = status
        .map(|status| status.trim().to_lowercase())
        .filter(|status| !status.is_empty())
    {
        list_query = list_query.status(OrderStatus::from(status));
    }

    if include_cancelled {
        list_query = list_query.include_cancelled();
    }

    let (total, orders) = repo.list_orders(list_query).map_err(ServiceError::from)?;

    Ok(OrdersPage { orders, total })
}

/// Fetches one order of the tenant.
pub fn load_order<R>(repo: &R, tenant_id: TenantId, sale_id: SaleId) -> ServiceResult<Sale>
where
    R: SaleReader + ?Sized,
{
    repo.get_sale_by_id(sale_id, tenant_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Moves an order to the requested stage.
pub fn update_order_status<R>(
    repo: &R,
    tenant_id: TenantId,
    sale_id: SaleId,
    form: OrderStatusForm,
) -> ServiceResult<Sale>
where
    R: SaleWriter + ?Sized,
{
    let status = form
        .into_order_status()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    log::info!("Order {sale_id} moved to {status}");

    repo.update_sale(sale_id, tenant_id, &UpdateSale::new().order_status(status))
        .map_err(ServiceError::from)
}

/// Records delivery or pickup details on an existing sale.
pub fn attach_remote_order<R>(
    repo: &R,
    tenant_id: TenantId,
    sale_id: SaleId,
    form: RemoteOrderForm,
) -> ServiceResult<Sale>
where
    R: SaleWriter + ?Sized,
{
    let details = form
        .into_order_details()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_sale(sale_id, tenant_id, &UpdateSale::new().order(details))
        .map_err(ServiceError::from)
}

/// Seats an existing sale at a table of the venue.
pub fn attach_dine_in_order<R>(
    repo: &R,
    tenant_id: TenantId,
    sale_id: SaleId,
    form: DineInOrderForm,
) -> ServiceResult<Sale>
where
    R: SaleWriter + ?Sized,
{
    let details = form
        .into_order_details()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    log::info!("Order {sale_id} seated at table {:?}", details.table_id);

    repo.update_sale(sale_id, tenant_id, &UpdateSale::new().order(details))
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::domain::sale::{DistanceTier, OrderDetails, OrderType};
    use crate::repository::RepositoryError;
    use crate::repository::mock::{MockSaleReader, MockSaleWriter};

    fn tenant() -> TenantId {
        TenantId::new(Uuid::from_u128(7))
    }

    fn sample_sale(id: SaleId, status: Option<OrderStatus>) -> Sale {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        Sale {
            id,
            tenant_id: Some(tenant()),
            user_id: None,
            customer_id: None,
            total: 480.0,
            discount: 0.0,
            payment_method: "PENDENTE_PAGAMENTO".to_string(),
            notes: None,
            cancelled: false,
            order: OrderDetails {
                status,
                ..OrderDetails::default()
            },
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn list_orders_clamps_limit_and_normalizes_status() {
        let mut repo = MockSaleReader::new();
        repo.expect_list_orders()
            .withf(|query| {
                query.tenant_id == tenant()
                    && query.status == Some(OrderStatus::Paid)
                    && !query.include_cancelled
                    && query.pagination.map(|p| (p.page, p.per_page)) == Some((1, MAX_ORDERS_LIMIT))
            })
            .returning(|_| Ok((0, Vec::new())));

        let page = list_orders(
            &repo,
            tenant(),
            OrderQuery {
                status: Some(" Pago ".to_string()),
                include_cancelled: false,
                limit: Some(10_000),
            },
        )
        .expect("list orders");

        assert_eq!(page.total, 0);
        assert!(page.orders.is_empty());
    }

    #[test]
    fn list_orders_uses_default_limit_and_can_include_cancelled() {
        let mut repo = MockSaleReader::new();
        repo.expect_list_orders()
            .withf(|query| {
                query.status.is_none()
                    && query.include_cancelled
                    && query.pagination.map(|p| p.per_page) == Some(DEFAULT_ORDERS_LIMIT)
            })
            .returning(|_| {
                let sale = sample_sale(SaleId::new(Uuid::from_u128(1)), None);
                Ok((1, vec![sale]))
            });

        let page = list_orders(
            &repo,
            tenant(),
            OrderQuery {
                status: Some("   ".to_string()),
                include_cancelled: true,
                limit: None,
            },
        )
        .expect("list orders");

        assert_eq!(page.total, 1);
        assert_eq!(page.orders.len(), 1);
    }

    #[test]
    fn list_orders_raises_zero_limit_to_one() {
        let mut repo = MockSaleReader::new();
        repo.expect_list_orders()
            .withf(|query| query.pagination.map(|p| p.per_page) == Some(1))
            .returning(|_| Ok((0, Vec::new())));

        let query = OrderQuery {
            limit: Some(0),
            ..OrderQuery::default()
        };
        assert!(list_orders(&repo, tenant(), query).is_ok());
    }

    #[test]
    fn load_order_reports_missing_sale() {
        let mut repo = MockSaleReader::new();
        repo.expect_get_sale_by_id().returning(|_, _| Ok(None));

        let result = load_order(&repo, tenant(), SaleId::new(Uuid::from_u128(3)));
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn cancelling_an_order_flags_the_sale() {
        let sale_id = SaleId::new(Uuid::from_u128(4));
        let mut repo = MockSaleWriter::new();
        repo.expect_update_sale()
            .withf(move |id, tenant_id, updates| {
                *id == sale_id
                    && *tenant_id == tenant()
                    && updates.order_status == Some(OrderStatus::Other("cancelada".to_string()))
                    && updates.cancelled == Some(true)
            })
            .returning(|id, _, updates| {
                let mut sale = sample_sale(id, updates.order_status.clone());
                sale.cancelled = true;
                Ok(sale)
            });

        let sale = update_order_status(
            &repo,
            tenant(),
            sale_id,
            OrderStatusForm {
                status: "Cancelada".to_string(),
            },
        )
        .expect("update status");

        assert!(sale.cancelled);
    }

    #[test]
    fn status_change_leaves_cancelled_flag_alone() {
        let mut repo = MockSaleWriter::new();
        repo.expect_update_sale()
            .withf(|_, _, updates| {
                updates.order_status == Some(OrderStatus::Paid) && updates.cancelled.is_none()
            })
            .returning(|id, _, updates| Ok(sample_sale(id, updates.order_status.clone())));

        let sale = update_order_status(
            &repo,
            tenant(),
            SaleId::new(Uuid::from_u128(5)),
            OrderStatusForm {
                status: "pago".to_string(),
            },
        )
        .expect("update status");

        assert_eq!(sale.order.status, Some(OrderStatus::Paid));
    }

    #[test]
    fn invalid_status_never_reaches_repository() {
        let repo = MockSaleWriter::new();

        let result = update_order_status(
            &repo,
            tenant(),
            SaleId::new(Uuid::from_u128(6)),
            OrderStatusForm {
                status: String::new(),
            },
        );

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn attach_remote_order_writes_delivery_details() {
        let mut repo = MockSaleWriter::new();
        repo.expect_update_sale()
            .withf(|_, _, updates| {
                updates.order.as_ref().is_some_and(|order| {
                    order.order_type == Some(OrderType::Remote)
                        && order.distance_tier == Some(DistanceTier::Delivery)
                        && order.delivery_fee == 60.0
                })
            })
            .returning(|id, _, updates| {
                let mut sale = sample_sale(id, None);
                sale.order = updates.order.clone().unwrap_or_default();
                Ok(sale)
            });

        let form = RemoteOrderForm {
            kind: "entrega".to_string(),
            customer_name: "Carlos Tembe".to_string(),
            customer_phone: "861234567".to_string(),
            delivery_address: Some("Rua da Resistência 45".to_string()),
            delivery_fee: 60.0,
        };

        let sale = attach_remote_order(&repo, tenant(), SaleId::new(Uuid::from_u128(8)), form)
            .expect("attach order");

        assert_eq!(sale.order.status, Some(OrderStatus::AwaitingPayment));
        assert_eq!(sale.amount_due(), 540.0);
    }

    #[test]
    fn attach_remote_order_on_missing_sale_is_not_found() {
        let mut repo = MockSaleWriter::new();
        repo.expect_update_sale()
            .returning(|_, _, _| Err(RepositoryError::NotFound));

        let form = RemoteOrderForm {
            kind: "retirada".to_string(),
            customer_name: "Carlos Tembe".to_string(),
            customer_phone: "861234567".to_string(),
            delivery_address: None,
            delivery_fee: 0.0,
        };

        let result =
            attach_remote_order(&repo, tenant(), SaleId::new(Uuid::from_u128(9)), form);
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn attach_dine_in_order_records_table_and_seat() {
        let sale_id = SaleId::new(Uuid::from_u128(10));
        let mut repo = MockSaleWriter::new();
        repo.expect_update_sale()
            .withf(move |id, tenant_id, updates| {
                *id == sale_id
                    && *tenant_id == tenant()
                    && updates.order.as_ref().is_some_and(|order| {
                        order.order_type == Some(OrderType::DineIn)
                            && order.table_id == Some(12)
                            && order.seat_number == Some(3)
                    })
            })
            .times(1)
            .returning(|id, _, updates| {
                let mut sale = sample_sale(id, None);
                sale.order = updates.order.clone().unwrap_or_default();
                Ok(sale)
            });

        let sale = attach_dine_in_order(
            &repo,
            tenant(),
            sale_id,
            DineInOrderForm {
                table_id: 12,
                seat_number: 3,
            },
        )
        .expect("seat order");

        assert_eq!(sale.order.status, Some(OrderStatus::Created));
        assert_eq!(sale.order.table_id, Some(12));
    }

    #[test]
    fn dine_in_without_table_never_reaches_repository() {
        let repo = MockSaleWriter::new();

        let result = attach_dine_in_order(
            &repo,
            tenant(),
            SaleId::new(Uuid::from_u128(11)),
            DineInOrderForm {
                table_id: 0,
                seat_number: 1,
            },
        );

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
