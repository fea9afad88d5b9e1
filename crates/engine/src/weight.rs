//! Weight resolution: which of a batch's candidate weights is its weight,
//! and which PMFM a weight is stored under.

use batchtree_core::{MethodId, Pmfm, Weight};
use batchtree_model::Batch;

/// Observed beats estimated beats computed.
fn preference_rank(weight: &Weight) -> u8 {
    10 * u8::from(weight.computed) + u8::from(weight.estimated)
}

/// Resolve the effective weight of `batch`.
///
/// A non-empty explicit weight is returned as is, even without a value.
/// Otherwise every PMFM of `weight_pmfms` holding a numeric value becomes a
/// candidate, and the most preferred one is returned; ties go to the
/// earlier PMFM.
pub fn resolve_weight(batch: &Batch, weight_pmfms: &[Pmfm]) -> Option<Weight> {
    if let Some(weight) = batch.weight.as_ref().filter(|w| !w.is_empty()) {
        return Some(weight.clone());
    }

    weight_pmfms
        .iter()
        .filter_map(|pmfm| {
            let value = batch.measurement_values.get_number(pmfm.id)?;
            Some(Weight::new(value, pmfm.method_id, pmfm.is_computed))
        })
        .enumerate()
        .min_by_key(|(index, weight)| (preference_rank(weight), *index))
        .map(|(_, weight)| weight)
}

/// Find the PMFM a weight belongs under: the estimated PMFM for estimated
/// weights, the PMFM of the same method (else the generic calculated one)
/// for computed weights, and the first candidate otherwise.
pub fn resolve_weight_pmfm<'a>(weight: &Weight, weight_pmfms: &'a [Pmfm]) -> Option<&'a Pmfm> {
    let by_method = |method: MethodId| weight_pmfms.iter().find(|p| p.method_id == method);

    if weight.estimated {
        by_method(MethodId::EstimatedByObserver)
    } else if weight.computed {
        weight
            .method_id
            .and_then(by_method)
            .or_else(|| by_method(MethodId::Calculated))
    } else {
        weight_pmfms.first()
    }
}
