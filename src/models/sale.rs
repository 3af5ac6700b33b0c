use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::sale::{
    DistanceTier, NewSale as DomainNewSale, OrderDetails, OrderStatus, OrderType,
    Sale as DomainSale, UpdateSale as DomainUpdateSale, normalize_delivery_fee,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::vendas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Sale {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tenant_id: Option<Uuid>,
    pub usuario_id: Option<Uuid>,
    pub cliente_id: Option<Uuid>,
    pub total: f64,
    pub desconto: f64,
    pub forma_pagamento: String,
    pub observacoes: Option<String>,
    pub cancelada: bool,
    pub tipo_pedido: Option<String>,
    pub status_pedido: Option<String>,
    pub mesa_id: Option<i32>,
    pub lugar_numero: Option<i32>,
    pub distancia_tipo: Option<String>,
    pub cliente_nome: Option<String>,
    pub cliente_telefone: Option<String>,
    pub endereco_entrega: Option<String>,
    pub taxa_entrega: f64,
}

/// The order columns, written together on insert and on replacement.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::vendas)]
#[diesel(treat_none_as_null = true)]
pub struct OrderFields<'a> {
    pub tipo_pedido: Option<&'a str>,
    pub status_pedido: Option<&'a str>,
    pub mesa_id: Option<i32>,
    pub lugar_numero: Option<i32>,
    pub distancia_tipo: Option<&'a str>,
    pub cliente_nome: Option<&'a str>,
    pub cliente_telefone: Option<&'a str>,
    pub endereco_entrega: Option<&'a str>,
    pub taxa_entrega: f64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::vendas)]
pub struct NewSale<'a> {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub total: f64,
    pub desconto: f64,
    pub forma_pagamento: &'a str,
    pub observacoes: Option<&'a str>,
    #[diesel(embed)]
    pub order: OrderFields<'a>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::vendas)]
pub struct UpdateSale<'a> {
    pub forma_pagamento: Option<&'a str>,
    pub status_pedido: Option<&'a str>,
    pub cancelada: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

impl From<Sale> for DomainSale {
    fn from(value: Sale) -> Self {
        Self {
            id: value.id.into(),
            tenant_id: value.tenant_id.map(Into::into),
            user_id: value.usuario_id,
            customer_id: value.cliente_id,
            total: value.total,
            discount: value.desconto,
            payment_method: value.forma_pagamento,
            notes: value.observacoes,
            cancelled: value.cancelada,
            order: OrderDetails {
                order_type: value.tipo_pedido.map(OrderType::from),
                status: value.status_pedido.map(OrderStatus::from),
                table_id: value.mesa_id,
                seat_number: value.lugar_numero,
                distance_tier: value.distancia_tipo.map(DistanceTier::from),
                customer_name: value.cliente_nome,
                customer_phone: value.cliente_telefone,
                delivery_address: value.endereco_entrega,
                delivery_fee: value.taxa_entrega,
            },
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a OrderDetails> for OrderFields<'a> {
    fn from(value: &'a OrderDetails) -> Self {
        Self {
            tipo_pedido: value.order_type.as_ref().map(OrderType::as_str),
            status_pedido: value.status.as_ref().map(OrderStatus::as_str),
            mesa_id: value.table_id,
            lugar_numero: value.seat_number,
            distancia_tipo: value.distance_tier.as_ref().map(DistanceTier::as_str),
            cliente_nome: value.customer_name.as_deref(),
            cliente_telefone: value.customer_phone.as_deref(),
            endereco_entrega: value.delivery_address.as_deref(),
            taxa_entrega: normalize_delivery_fee(value.delivery_fee),
        }
    }
}

impl<'a> From<&'a DomainNewSale> for NewSale<'a> {
    fn from(value: &'a DomainNewSale) -> Self {
        Self {
            id: value.id.get(),
            tenant_id: value.tenant_id.map(|tenant| tenant.get()),
            total: value.total,
            desconto: value.discount,
            forma_pagamento: value.payment_method.as_str(),
            observacoes: value.notes.as_deref(),
            order: OrderFields::from(&value.order),
        }
    }
}

impl<'a> From<&'a DomainUpdateSale> for UpdateSale<'a> {
    fn from(value: &'a DomainUpdateSale) -> Self {
        Self {
            forma_pagamento: value.payment_method.as_deref(),
            status_pedido: value.order_status.as_ref().map(OrderStatus::as_str),
            cancelada: value.cancelled,
            updated_at: value.updated_at,
        }
    }
}
