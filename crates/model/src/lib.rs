pub mod batch;
pub mod denormalized;
pub mod display;
pub mod error;
pub mod flat;
pub mod label;
pub mod sampling_ratio;
pub mod wire;

pub use batch::{sum_observed_individual_count, Batch, EmptyOptions, TaxonRef};
pub use denormalized::DenormalizedBatch;
pub use display::{log_tree, render_tree};
pub use error::ModelError;
pub use flat::FlatTreeNode;
pub use label::{AcquisitionLevel, BatchKind, SAMPLING_BATCH_SUFFIX};
pub use sampling_ratio::{is_sampling_ratio_computed, parse_sampling_ratio, SamplingRatioFormat};
pub use wire::BatchJson;
