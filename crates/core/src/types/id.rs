//! Newtype IDs for type-safe entity references.
//!
//! Every entity kind gets its own id type so a `ServiceId` can never be
//! passed where a `UserId` is expected. Ids are assigned sequentially by the
//! entity store, which is why they are totally ordered.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - Conversion methods: `new()`, `as_i32()`, `next()`
/// - `From<i32>` and `Into<i32>` implementations
///
/// # Example
///
/// ```rust
/// # use skybook_core::define_id;
/// define_id!(UserId);
/// define_id!(BookingId);
///
/// let user_id = UserId::new(1);
/// let booking_id = BookingId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: UserId = booking_id;
/// assert!(user_id < user_id.next());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// The first id handed out for a fresh entity kind.
            pub const FIRST: Self = Self(1);

            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }

            /// The id that follows this one in assignment order.
            #[must_use]
            pub const fn next(self) -> Self {
                Self(self.0.saturating_add(1))
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(ServiceId);
define_id!(BookingId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_next_is_strictly_greater() {
        let id = ServiceId::FIRST;
        assert_eq!(id.as_i32(), 1);
        assert!(id.next() > id);
        assert_eq!(id.next().as_i32(), 2);
    }

    #[test]
    fn test_next_saturates() {
        let id = BookingId::new(i32::MAX);
        assert_eq!(id.next(), id);
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        let json = serde_json::to_string(&UserId::new(42)).unwrap();
        assert_eq!(json, "42");

        let parsed: UserId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, UserId::new(7));
    }

    #[test]
    fn test_display() {
        assert_eq!(BookingId::new(12).to_string(), "12");
    }
}
