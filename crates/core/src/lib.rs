pub mod error;
pub mod ids;
pub mod measurement;
pub mod pmfm;
pub mod pmfm_value;
pub mod quality;
pub mod weight;

pub use error::CoreError;
pub use ids::*;
pub use measurement::MeasurementValues;
pub use pmfm::{MethodId, Pmfm, PmfmType};
pub use pmfm_value::PmfmValue;
pub use quality::QualityFlag;
pub use weight::{round_half_up, Weight};
