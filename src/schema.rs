// Diesel table definitions for the tables touched by the migrations in `migrations/`.

diesel::table! {
    tenants (id) {
        id -> Uuid,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
        #[max_length = 200]
        nome -> Varchar,
        ativo -> Nullable<Bool>,
        #[max_length = 50]
        tipo_negocio -> Nullable<Varchar>,
    }
}

diesel::table! {
    pdv.vendas (id) {
        id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        tenant_id -> Nullable<Uuid>,
        usuario_id -> Nullable<Uuid>,
        cliente_id -> Nullable<Uuid>,
        total -> Float8,
        desconto -> Float8,
        #[max_length = 50]
        forma_pagamento -> Varchar,
        observacoes -> Nullable<Text>,
        cancelada -> Bool,
        #[max_length = 20]
        tipo_pedido -> Nullable<Varchar>,
        #[max_length = 30]
        status_pedido -> Nullable<Varchar>,
        mesa_id -> Nullable<Int4>,
        lugar_numero -> Nullable<Int4>,
        #[max_length = 20]
        distancia_tipo -> Nullable<Varchar>,
        #[max_length = 100]
        cliente_nome -> Nullable<Varchar>,
        #[max_length = 30]
        cliente_telefone -> Nullable<Varchar>,
        endereco_entrega -> Nullable<Text>,
        taxa_entrega -> Float8,
    }
}

diesel::table! {
    pdv.payment_transactions (id) {
        id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        tenant_id -> Nullable<Uuid>,
        venda_id -> Nullable<Uuid>,
        #[max_length = 20]
        provider -> Varchar,
        #[max_length = 30]
        phone -> Nullable<Varchar>,
        amount -> Float8,
        #[max_length = 10]
        currency -> Varchar,
        #[max_length = 20]
        status -> Varchar,
        #[max_length = 100]
        provider_reference -> Nullable<Varchar>,
    }
}

diesel::joinable!(payment_transactions -> tenants (tenant_id));
diesel::joinable!(payment_transactions -> vendas (venda_id));
diesel::joinable!(vendas -> tenants (tenant_id));

diesel::allow_tables_to_appear_in_same_query!(payment_transactions, tenants, vendas,);
