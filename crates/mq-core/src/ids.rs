//! Typed code wrappers for menu-domain primary keys.
//!
//! Each code is a newtype over `i64`, preventing accidental misuse
//! (e.g., passing a `CategoryCode` where a `MenuCode` is expected).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Generate a newtype code wrapper over `i64`.
///
/// The macro produces a struct with:
/// - `new(value)` and `get()`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`, `Serialize`, `Deserialize`
/// - `Display` and `FromStr` delegating to the inner integer
/// - `From<i64>` and `Into<i64>` conversions
macro_rules! typed_code {
    ($($(#[doc = $doc:expr])* $name:ident),+ $(,)?) => {
        $(
            $(#[doc = $doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(i64);

            impl $name {
                /// Wrap a raw code value.
                #[must_use]
                pub const fn new(value: i64) -> Self {
                    Self(value)
                }

                /// Return the raw code value.
                #[must_use]
                pub const fn get(self) -> i64 {
                    self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl FromStr for $name {
                type Err = ParseIntError;

                fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                    s.trim().parse::<i64>().map(Self)
                }
            }

            impl From<i64> for $name {
                fn from(value: i64) -> Self {
                    Self(value)
                }
            }

            impl From<$name> for i64 {
                fn from(code: $name) -> Self {
                    code.0
                }
            }
        )+
    };
}

typed_code! {
    /// Primary key of a menu row.
    MenuCode,
    /// Primary key of a category row.
    CategoryCode,
}
