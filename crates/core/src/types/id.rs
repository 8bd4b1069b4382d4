//! Typed numeric IDs.
//!
//! Products and categories are both numbered from 1 in the mock catalog,
//! so a bare integer would be easy to pass to the wrong lookup.

/// Define an `i32` newtype ID.
///
/// The generated type serializes as a plain number, displays as one, and
/// parses from a (possibly padded) decimal string such as a URL segment or
/// a form value.
///
/// ```rust
/// # use shophub_core::define_id;
/// define_id!(WidgetId);
///
/// let id: WidgetId = " 7 ".parse().unwrap();
/// assert_eq!(id, WidgetId::new(7));
/// assert_eq!(id.to_string(), "7");
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
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i32>().map(Self)
            }
        }
    };
}

define_id!(ProductId);
define_id!(CategoryId);
