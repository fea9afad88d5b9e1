use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! int_id {
    ($name:ident, $inner:ty) => {
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name($inner);

        impl $name {
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            pub const fn value(&self) -> $inner {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<$inner>().map(Self)
            }
        }
    };
}

int_id!(BatchId, i64);
int_id!(PmfmId, i32);
int_id!(ReferentialId, i32);

/// Well-known PMFM ids of the weight parameters.
pub mod pmfm_ids {
    use super::PmfmId;

    pub const BATCH_MEASURED_WEIGHT: PmfmId = PmfmId::new(91);
    pub const BATCH_ESTIMATED_WEIGHT: PmfmId = PmfmId::new(92);
    pub const BATCH_CALCULATED_WEIGHT: PmfmId = PmfmId::new(93);
    pub const BATCH_CALCULATED_WEIGHT_LENGTH: PmfmId = PmfmId::new(122);
    pub const BATCH_CALCULATED_WEIGHT_LENGTH_SUM: PmfmId = PmfmId::new(123);
}
