use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum QualityFlag {
    #[default]
    NotQualified,
    Good,
    OutStats,
    Doubtful,
    Bad,
    Fixed,
    NotCompleted,
    Missing,
}

impl QualityFlag {
    pub fn id(&self) -> i32 {
        match self {
            Self::NotQualified => 0,
            Self::Good => 1,
            Self::OutStats => 2,
            Self::Doubtful => 3,
            Self::Bad => 4,
            Self::Fixed => 5,
            Self::NotCompleted => 8,
            Self::Missing => 9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotQualified => "NOT_QUALIFIED",
            Self::Good => "GOOD",
            Self::OutStats => "OUT_STATS",
            Self::Doubtful => "DOUBTFUL",
            Self::Bad => "BAD",
            Self::Fixed => "FIXED",
            Self::NotCompleted => "NOT_COMPLETED",
            Self::Missing => "MISSING",
        }
    }
}

impl TryFrom<i32> for QualityFlag {
    type Error = CoreError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(Self::NotQualified),
            1 => Ok(Self::Good),
            2 => Ok(Self::OutStats),
            3 => Ok(Self::Doubtful),
            4 => Ok(Self::Bad),
            5 => Ok(Self::Fixed),
            8 => Ok(Self::NotCompleted),
            9 => Ok(Self::Missing),
            other => Err(CoreError::UnknownQualityFlag(other)),
        }
    }
}

impl From<QualityFlag> for i32 {
    fn from(flag: QualityFlag) -> Self {
        flag.id()
    }
}
