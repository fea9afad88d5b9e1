use serde::{Deserialize, Serialize};

use crate::ids::{pmfm_ids, PmfmId};

pub const UNIT_KG: &str = "kg";

/// Default weight precision: grams, when the unit is kg.
pub const DEFAULT_WEIGHT_DECIMALS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum MethodId {
    MeasuredByObserver,
    ObservedByObserver,
    EstimatedByObserver,
    Calculated,
    CalculatedWeightLength,
    CalculatedWeightLengthSum,
    Other(i32),
}

impl MethodId {
    pub fn id(&self) -> i32 {
        match self {
            Self::MeasuredByObserver => 1,
            Self::ObservedByObserver => 2,
            Self::EstimatedByObserver => 3,
            Self::Calculated => 4,
            Self::CalculatedWeightLength => 47,
            Self::CalculatedWeightLengthSum => 283,
            Self::Other(id) => *id,
        }
    }

    pub fn is_calculated(&self) -> bool {
        matches!(
            self,
            Self::Calculated | Self::CalculatedWeightLength | Self::CalculatedWeightLengthSum
        )
    }

    pub fn is_estimated(&self) -> bool {
        matches!(self, Self::EstimatedByObserver)
    }
}

impl From<i32> for MethodId {
    fn from(id: i32) -> Self {
        match id {
            1 => Self::MeasuredByObserver,
            2 => Self::ObservedByObserver,
            3 => Self::EstimatedByObserver,
            4 => Self::Calculated,
            47 => Self::CalculatedWeightLength,
            283 => Self::CalculatedWeightLengthSum,
            other => Self::Other(other),
        }
    }
}

impl From<MethodId> for i32 {
    fn from(method: MethodId) -> Self {
        method.id()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PmfmType {
    QualitativeValue,
    Integer,
    Double,
    String,
    Boolean,
    Date,
}

impl PmfmType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Double)
    }
}

/// Read-only PMFM descriptor, as supplied by the referential service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pmfm {
    pub id: PmfmId,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub pmfm_type: PmfmType,
    pub method_id: MethodId,
    #[serde(default)]
    pub is_computed: bool,
    #[serde(default)]
    pub maximum_number_decimals: Option<u32>,
    #[serde(default)]
    pub unit_label: Option<String>,
}

impl Pmfm {
    fn weight(id: PmfmId, method_id: MethodId, is_computed: bool) -> Self {
        Self {
            id,
            label: Some("WEIGHT".to_string()),
            pmfm_type: PmfmType::Double,
            method_id,
            is_computed,
            maximum_number_decimals: Some(DEFAULT_WEIGHT_DECIMALS),
            unit_label: Some(UNIT_KG.to_string()),
        }
    }

    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.maximum_number_decimals = Some(decimals);
        self
    }

    /// Built-in weight PMFM catalog, in resolution priority order.
    pub fn default_weight_pmfms() -> Vec<Pmfm> {
        vec![
            Self::weight(pmfm_ids::BATCH_MEASURED_WEIGHT, MethodId::MeasuredByObserver, false),
            Self::weight(pmfm_ids::BATCH_ESTIMATED_WEIGHT, MethodId::EstimatedByObserver, false),
            Self::weight(
                pmfm_ids::BATCH_CALCULATED_WEIGHT_LENGTH,
                MethodId::CalculatedWeightLength,
                true,
            )
            .with_decimals(6),
            Self::weight(
                pmfm_ids::BATCH_CALCULATED_WEIGHT_LENGTH_SUM,
                MethodId::CalculatedWeightLengthSum,
                true,
            ),
            Self::weight(pmfm_ids::BATCH_CALCULATED_WEIGHT, MethodId::Calculated, true),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_ids_round_trip_through_wire_ids() {
        for id in [1, 2, 3, 4, 47, 283, 12] {
            assert_eq!(MethodId::from(id).id(), id);
        }
        assert_eq!(MethodId::from(12), MethodId::Other(12));
        assert!(MethodId::CalculatedWeightLengthSum.is_calculated());
        assert!(!MethodId::EstimatedByObserver.is_calculated());
    }

    #[test]
    fn default_catalog_is_ordered_by_priority() {
        let pmfms = Pmfm::default_weight_pmfms();
        let methods: Vec<MethodId> = pmfms.iter().map(|p| p.method_id).collect();
        assert_eq!(
            methods,
            vec![
                MethodId::MeasuredByObserver,
                MethodId::EstimatedByObserver,
                MethodId::CalculatedWeightLength,
                MethodId::CalculatedWeightLengthSum,
                MethodId::Calculated,
            ]
        );
        assert_eq!(pmfms[2].maximum_number_decimals, Some(6));
        assert!(pmfms.iter().all(|p| p.unit_label.as_deref() == Some(UNIT_KG)));
    }

    #[test]
    fn deserializes_descriptor_json() {
        let pmfm: Pmfm = serde_json::from_str(
            r#"{"id": 91, "type": "double", "methodId": 1, "maximumNumberDecimals": 2}"#,
        )
        .unwrap();
        assert_eq!(pmfm.id, pmfm_ids::BATCH_MEASURED_WEIGHT);
        assert_eq!(pmfm.method_id, MethodId::MeasuredByObserver);
        assert!(!pmfm.is_computed);
        assert_eq!(pmfm.maximum_number_decimals, Some(2));
    }
}
