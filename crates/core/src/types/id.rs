//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different Sapo resources. Sapo identifiers are
//! plain 64-bit integers; existence and sign are left to the API to judge.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>` and `Into<i64>` implementations
///
/// # Example
///
/// ```rust
/// # use sapo_core::define_id;
/// define_id!(ShopId);
/// define_id!(ThemeId);
///
/// let shop_id = ShopId::new(1);
/// let theme_id = ThemeId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: ShopId = theme_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(OrderId);
define_id!(CustomerId);
define_id!(CollectionId);
define_id!(LocationId);
define_id!(TransferId);
define_id!(PriceRuleId);
define_id!(FulfillmentId);
define_id!(FulfillmentEventId);
define_id!(MetafieldId);
define_id!(PageId);
define_id!(BlogId);
define_id!(ArticleId);
define_id!(CommentId);
define_id!(WebhookId);

define_id!(
    /// Owner ID for a metafield (a product, order, article, ... depending on owner type).
    ResourceId
);
