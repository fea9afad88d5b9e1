use serde::{Deserialize, Serialize};

use batchtree_core::{BatchId, MeasurementValues, QualityFlag, Weight};

use crate::batch::TaxonRef;
use crate::label::BatchKind;

/// Flat, server-computed batch record used for reporting. Weights and
/// counts are trusted as delivered; only structure and indentation are
/// rebuilt locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DenormalizedBatch {
    pub id: Option<BatchId>,
    pub parent_id: Option<BatchId>,
    pub operation_id: Option<i64>,
    pub sale_id: Option<i64>,
    pub label: String,
    pub rank_order: Option<i32>,
    pub tree_level: Option<u32>,
    pub tree_indent: String,
    pub individual_count: Option<i32>,
    pub indirect_individual_count: Option<i32>,
    pub weight: Option<Weight>,
    pub indirect_weight: Option<Weight>,
    pub sampling_ratio: Option<f64>,
    pub sampling_ratio_text: Option<String>,
    pub exhaustive_inventory: bool,
    pub is_landing: bool,
    pub is_discard: bool,
    pub taxon_group: Option<TaxonRef>,
    pub taxon_name: Option<TaxonRef>,
    pub measurement_values: MeasurementValues,
    #[serde(rename = "qualityFlagId")]
    pub quality_flag: QualityFlag,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DenormalizedBatch>,
}

impl DenormalizedBatch {
    pub fn new(id: BatchId, label: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn kind(&self) -> BatchKind {
        BatchKind::from_label(&self.label)
    }

    pub fn is_sampling_batch(&self) -> bool {
        self.kind() == BatchKind::Sampling
    }

    /// Read a JSON array of records, as delivered by the backend.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, crate::ModelError> {
        Ok(serde_json::from_str(json)?)
    }
}
