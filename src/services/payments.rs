use crate::domain::ids::{PaymentId, SaleId, TenantId};
use crate::domain::payment::{
    NewPaymentTransaction, PaymentListQuery, PaymentStatus, PaymentTransaction,
};
use crate::domain::sale::OrderStatus;
use crate::forms::payments::CheckoutForm;
use crate::repository::{PaymentReader, PaymentWriter, SaleReader};
use crate::services::{ServiceError, ServiceResult};

/// Starts a mobile money payment for the full total of a sale.
pub fn checkout_payment<R>(
    repo: &R,
    tenant_id: TenantId,
    form: CheckoutForm,
) -> ServiceResult<PaymentTransaction>
where
    R: SaleReader + PaymentWriter + ?Sized,
{
    let request = form
        .into_checkout_request()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let sale = repo
        .get_sale_by_id(request.sale_id, tenant_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if sale.cancelled {
        return Err(ServiceError::Conflict(format!("sale {} is cancelled", sale.id)));
    }

    let new_payment = NewPaymentTransaction::new(PaymentId::generate(), request.provider)
        .with_tenant(tenant_id)
        .with_sale(sale.id)
        .with_phone(request.phone)
        .with_amount(sale.total);

    let payment = repo
        .create_payment(&new_payment)
        .map_err(ServiceError::from)?;
    log::info!(
        "Payment {} of {} {} started via {} for sale {}",
        payment.id,
        payment.amount,
        payment.currency,
        payment.provider,
        sale.id
    );

    Ok(payment)
}

/// Fetches one payment of the tenant.
pub fn get_payment<R>(
    repo: &R,
    tenant_id: TenantId,
    payment_id: PaymentId,
) -> ServiceResult<PaymentTransaction>
where
    R: PaymentReader + ?Sized,
{
    repo.get_payment_by_id(payment_id, tenant_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Every payment attempt made against a sale, newest first.
pub fn list_sale_payments<R>(
    repo: &R,
    tenant_id: TenantId,
    sale_id: SaleId,
) -> ServiceResult<Vec<PaymentTransaction>>
where
    R: PaymentReader + ?Sized,
{
    let query = PaymentListQuery::new(tenant_id).sale(sale_id);
    let (_, payments) = repo.list_payments(query).map_err(ServiceError::from)?;
    Ok(payments)
}

/// Confirms a payment and settles the sale it was made for.
///
/// The linked sale takes the provider code as its payment method and moves to
/// `pago` in the same transaction as the payment. Confirming a paid
/// transaction whose sale is already settled changes nothing.
pub fn mark_payment_paid<R>(
    repo: &R,
    tenant_id: TenantId,
    payment_id: PaymentId,
    provider_reference: Option<String>,
) -> ServiceResult<PaymentTransaction>
where
    R: PaymentReader + PaymentWriter + SaleReader + ?Sized,
{
    let payment = get_payment(repo, tenant_id, payment_id)?;
    if payment.status == PaymentStatus::Paid && sale_is_settled(repo, tenant_id, &payment)? {
        return Ok(payment);
    }

    let reference = provider_reference.filter(|r| !r.trim().is_empty());
    let payment = repo
        .settle_payment(payment_id, tenant_id, reference)
        .map_err(ServiceError::from)?;

    match payment.sale_id {
        Some(sale_id) => log::info!("Sale {sale_id} paid through payment {payment_id}"),
        None => log::info!("Payment {payment_id} confirmed"),
    }

    Ok(payment)
}

fn sale_is_settled<R>(
    repo: &R,
    tenant_id: TenantId,
    payment: &PaymentTransaction,
) -> ServiceResult<bool>
where
    R: SaleReader + ?Sized,
{
    let Some(sale_id) = payment.sale_id else {
        return Ok(true);
    };

    let sale = repo
        .get_sale_by_id(sale_id, tenant_id)
        .map_err(ServiceError::from)?;
    Ok(sale.is_some_and(|sale| sale.effective_status() == OrderStatus::Paid))
}
