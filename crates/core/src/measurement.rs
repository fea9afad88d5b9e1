use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::ids::PmfmId;
use crate::pmfm::Pmfm;
use crate::pmfm_value::PmfmValue;

/// Measurement values of one entity, keyed by PMFM.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementValues {
    entries: BTreeMap<PmfmId, PmfmValue>,
}

impl MeasurementValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pmfm_id: PmfmId) -> Option<&PmfmValue> {
        self.entries.get(&pmfm_id)
    }

    pub fn get_number(&self, pmfm_id: PmfmId) -> Option<f64> {
        self.get(pmfm_id).and_then(PmfmValue::as_number)
    }

    pub fn set(&mut self, pmfm_id: PmfmId, value: PmfmValue) {
        self.entries.insert(pmfm_id, value);
    }

    pub fn remove(&mut self, pmfm_id: PmfmId) -> Option<PmfmValue> {
        self.entries.remove(&pmfm_id)
    }

    /// True when no entry holds a non-empty value.
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(PmfmValue::is_empty)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Read the wire map (decimal string keys). Keys that are not PMFM ids
    /// (e.g. `__typename`) are ignored.
    pub fn from_wire(map: &Map<String, Value>, pmfms: &[Pmfm]) -> Result<Self, CoreError> {
        let mut values = Self::new();
        for (key, raw) in map {
            let Ok(pmfm_id) = key.parse::<PmfmId>() else {
                continue;
            };
            let pmfm = pmfms.iter().find(|p| p.id == pmfm_id);
            if let Some(value) = PmfmValue::from_wire(raw, pmfm)? {
                values.set(pmfm_id, value);
            }
        }
        Ok(values)
    }

    pub fn to_wire(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(id, value)| (id.to_string(), value.to_wire()))
            .collect()
    }
}

impl FromIterator<(PmfmId, PmfmValue)> for MeasurementValues {
    fn from_iter<T: IntoIterator<Item = (PmfmId, PmfmValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Untyped serde form: values are read by JSON type, without PMFM
/// descriptors. Use [`MeasurementValues::from_wire`] when descriptors exist.
impl Serialize for MeasurementValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MeasurementValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map: Map<String, Value> = Deserialize::deserialize(deserializer)?;
        Self::from_wire(&map, &[]).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::pmfm_ids;
    use serde_json::json;

    #[test]
    fn wire_keys_are_decimal_strings() {
        let wire = json!({"91": 0.5, "__typename": "MeasurementValues", "92": null});
        let values = MeasurementValues::from_wire(
            wire.as_object().unwrap(),
            &Pmfm::default_weight_pmfms(),
        )
        .unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values.get_number(pmfm_ids::BATCH_MEASURED_WEIGHT), Some(0.5));
        assert_eq!(Value::Object(values.to_wire()), json!({"91": 0.5}));
    }

    #[test]
    fn empty_when_only_blank_values() {
        let mut values = MeasurementValues::new();
        assert!(values.is_empty());
        values.set(PmfmId::new(5), PmfmValue::Text(String::new()));
        assert!(values.is_empty());
        values.set(PmfmId::new(6), PmfmValue::Numeric(0.0));
        assert!(!values.is_empty());
    }
}
