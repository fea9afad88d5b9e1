//! Label conventions. The wire label carries the node role
//! (`CATCH_BATCH`, `SORTING_BATCH#3`, `SORTING_BATCH#3.%`,
//! `SORTING_BATCH_INDIVIDUAL#7`); [`BatchKind`] is its parsed form.

pub const SAMPLING_BATCH_SUFFIX: &str = ".%";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcquisitionLevel {
    CatchBatch,
    SortingBatch,
    SortingBatchIndividual,
}

impl AcquisitionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CatchBatch => "CATCH_BATCH",
            Self::SortingBatch => "SORTING_BATCH",
            Self::SortingBatchIndividual => "SORTING_BATCH_INDIVIDUAL",
        }
    }

    /// Label prefix of nodes at this level, e.g. `SORTING_BATCH#`.
    pub fn label_prefix(&self) -> String {
        format!("{}#", self.as_str())
    }

    pub fn matches(&self, label: &str) -> bool {
        label
            .strip_prefix(self.as_str())
            .is_some_and(|rest| rest.starts_with('#'))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BatchKind {
    Catch,
    Sorting,
    Individual,
    Sampling,
    #[default]
    Unknown,
}

impl BatchKind {
    pub fn from_label(label: &str) -> Self {
        if label.is_empty() {
            Self::Unknown
        } else if label.ends_with(SAMPLING_BATCH_SUFFIX) {
            Self::Sampling
        } else if AcquisitionLevel::SortingBatchIndividual.matches(label) {
            Self::Individual
        } else if AcquisitionLevel::SortingBatch.matches(label) {
            Self::Sorting
        } else if label == AcquisitionLevel::CatchBatch.as_str()
            || AcquisitionLevel::CatchBatch.matches(label)
        {
            Self::Catch
        } else {
            Self::Unknown
        }
    }
}

pub fn sampling_label(parent_label: &str) -> String {
    format!("{parent_label}{SAMPLING_BATCH_SUFFIX}")
}

pub fn individual_label(rank_order: i32) -> String {
    format!("{}{rank_order}", AcquisitionLevel::SortingBatchIndividual.label_prefix())
}
