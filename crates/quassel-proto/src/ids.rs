//! Numeric identifiers assigned by the core.
//!
//! Each identifier is a transparent newtype so that a buffer id can never be
//! passed where a network id is expected.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<$inner>().map($name)
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                $name(value)
            }
        }
    };
}

numeric_id!(
    /// Identifier of an IRC network configured on the core.
    NetworkId(i32)
);
numeric_id!(
    /// Identifier of a buffer (status window, channel or query).
    BufferId(i32)
);
numeric_id!(
    /// Identifier of an identity (nick set, real name, away settings).
    IdentityId(i32)
);
numeric_id!(
    /// Identifier of a single stored message.
    MsgId(i64)
);
