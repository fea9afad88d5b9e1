use serde::{Deserialize, Serialize};

use crate::pmfm::{MethodId, UNIT_KG};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weight {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub method_id: Option<MethodId>,
    #[serde(default)]
    pub computed: bool,
    #[serde(default)]
    pub estimated: bool,
}

fn default_unit() -> String {
    UNIT_KG.to_string()
}

impl Default for Weight {
    fn default() -> Self {
        Self {
            value: None,
            unit: default_unit(),
            method_id: None,
            computed: false,
            estimated: false,
        }
    }
}

impl Weight {
    /// Build a weight whose flags follow from the method:
    /// `estimated` iff estimated by observer, `computed` if the source is
    /// computed or the method is a calculation.
    pub fn new(value: f64, method_id: MethodId, is_computed: bool) -> Self {
        Self {
            value: Some(value),
            unit: default_unit(),
            method_id: Some(method_id),
            computed: is_computed || method_id.is_calculated(),
            estimated: method_id.is_estimated(),
        }
    }

    pub fn computed(value: f64, method_id: MethodId) -> Self {
        Self::new(value, method_id, true)
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.method_id.is_none() && !self.computed
    }

    /// Value, with NaN treated as absent.
    pub fn value(&self) -> Option<f64> {
        self.value.filter(|v| !v.is_nan())
    }
}

/// Round half away from zero at `decimals` places.
///
/// The scaled value is first snapped to 9 decimals so that binary
/// representation error (`1.0005 * 1000 = 1000.4999…`) does not flip the
/// rounding direction.
pub fn round_half_up(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    let snapped = (scaled * 1e9).round() / 1e9;
    snapped.round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_half_up(1.2345 + 2.3456, 3), 3.58);
        assert_eq!(round_half_up(1.0005, 3), 1.001);
        assert_eq!(round_half_up(0.125, 2), 0.13);
        assert_eq!(round_half_up(-0.125, 2), -0.13);
        assert_eq!(round_half_up(2.5, 0), 3.0);
        assert_eq!(round_half_up(0.1234567, 6), 0.123457);
    }

    #[test]
    fn flags_follow_method() {
        let estimated = Weight::new(1.0, MethodId::EstimatedByObserver, false);
        assert!(estimated.estimated);
        assert!(!estimated.computed);

        let by_length = Weight::new(1.0, MethodId::CalculatedWeightLength, false);
        assert!(by_length.computed);
        assert!(!by_length.estimated);

        let measured = Weight::new(1.0, MethodId::MeasuredByObserver, false);
        assert!(!measured.computed && !measured.estimated);
    }

    #[test]
    fn empty_weight() {
        assert!(Weight::default().is_empty());
        assert!(!Weight::computed(0.2, MethodId::Calculated).is_empty());
        let flagged_only = Weight {
            computed: true,
            ..Weight::default()
        };
        assert!(!flagged_only.is_empty());
    }

    #[test]
    fn wire_shape() {
        let weight: Weight =
            serde_json::from_str(r#"{"value": 1.5, "methodId": 4, "computed": true}"#).unwrap();
        assert_eq!(weight.unit, "kg");
        assert_eq!(weight.method_id, Some(MethodId::Calculated));
        let json = serde_json::to_value(&weight).unwrap();
        assert_eq!(json["methodId"], 4);
    }
}
