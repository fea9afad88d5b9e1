//! JSON boundary of [`Batch`]. Measurement values stay loosely typed here
//! and are coerced against PMFM descriptors on the way in.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use batchtree_core::{BatchId, MeasurementValues, Pmfm, QualityFlag, Weight};

use crate::batch::{Batch, TaxonRef};
use crate::error::ModelError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<BatchId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<BatchId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<i64>,
    pub label: Option<String>,
    pub rank_order: Option<i32>,
    pub individual_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children_weight: Option<Weight>,
    pub sampling_ratio: Option<f64>,
    pub sampling_ratio_text: Option<String>,
    pub exhaustive_inventory: Option<bool>,
    pub taxon_group: Option<TaxonRef>,
    pub taxon_name: Option<TaxonRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub measurement_values: Map<String, Value>,
    #[serde(rename = "qualityFlagId")]
    pub quality_flag: QualityFlag,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BatchJson>,
}

impl Batch {
    /// Build a batch tree from its nested JSON form. Measurement values are
    /// typed with `pmfms`; values of unknown PMFMs are read by JSON type.
    pub fn from_json(value: Value, pmfms: &[Pmfm]) -> Result<Batch, ModelError> {
        let json: BatchJson = serde_json::from_value(value)?;
        Batch::from_wire(json, pmfms)
    }

    pub fn from_wire(json: BatchJson, pmfms: &[Pmfm]) -> Result<Batch, ModelError> {
        let mut batch = Batch::new(json.label.unwrap_or_default());
        batch.id = json.id;
        batch.parent_id = json.parent_id;
        batch.operation_id = json.operation_id;
        batch.rank_order = json.rank_order;
        batch.individual_count = json.individual_count;
        batch.weight = json.weight;
        batch.children_weight = json.children_weight;
        batch.sampling_ratio = json.sampling_ratio;
        batch.sampling_ratio_text = json.sampling_ratio_text;
        batch.exhaustive_inventory = json.exhaustive_inventory;
        batch.taxon_group = json.taxon_group;
        batch.taxon_name = json.taxon_name;
        batch.comments = json.comments;
        batch.measurement_values = MeasurementValues::from_wire(&json.measurement_values, pmfms)?;
        batch.quality_flag = json.quality_flag;
        batch.children = json
            .children
            .into_iter()
            .map(|child| Batch::from_wire(child, pmfms))
            .collect::<Result<_, _>>()?;
        Ok(batch)
    }

    pub fn to_wire(&self) -> BatchJson {
        BatchJson {
            id: self.id,
            parent_id: self.parent_id,
            operation_id: self.operation_id,
            label: self.has_label().then(|| self.label().to_string()),
            rank_order: self.rank_order,
            individual_count: self.individual_count,
            weight: self.weight.clone(),
            children_weight: self.children_weight.clone(),
            sampling_ratio: self.sampling_ratio,
            sampling_ratio_text: self.sampling_ratio_text.clone(),
            exhaustive_inventory: self.exhaustive_inventory,
            taxon_group: self.taxon_group.clone(),
            taxon_name: self.taxon_name.clone(),
            comments: self.comments.clone(),
            measurement_values: self.measurement_values.to_wire(),
            quality_flag: self.quality_flag,
            children: self.children.iter().map(Batch::to_wire).collect(),
        }
    }

    pub fn to_json(&self) -> Result<Value, ModelError> {
        Ok(serde_json::to_value(self.to_wire())?)
    }
}
