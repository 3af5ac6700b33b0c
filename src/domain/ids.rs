//! Typed identifiers for the entities referenced by the PDV schema.
//!
//! Wrapping the raw UUIDs keeps a tenant id from being passed where a sale
//! id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub const fn new(id: Uuid) -> Self {
                Self(id)
            }

            /// The underlying UUID.
            pub const fn get(self) -> Uuid {
                self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

typed_id!(
    /// Owning tenant (customer organisation) of a row.
    TenantId
);

typed_id!(
    /// Primary key of a `pdv.vendas` row.
    SaleId
);

typed_id!(
    /// Primary key of a `pdv.payment_transactions` row.
    PaymentId
);

impl PaymentId {
    /// Generate a fresh random identifier. The store never assigns payment ids.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}
