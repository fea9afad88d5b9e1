//! Bottom-up aggregation over a batch tree: rank orders, individual counts
//! and weight sums. Every pass is idempotent.

use std::cmp::Ordering;

use tracing::{debug, warn};

use batchtree_core::{round_half_up, MethodId, Pmfm, PmfmValue, QualityFlag, Weight};
use batchtree_model::label::{individual_label, sampling_label};
use batchtree_model::{Batch, EmptyOptions};

use crate::error::EngineError;
use crate::weight::{resolve_weight, resolve_weight_pmfm};

/// `None` sorts after every value.
fn cmp_none_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn require_label(batch: &Batch) -> Result<(), EngineError> {
    if batch.has_label() {
        Ok(())
    } else {
        Err(EngineError::MissingLabel)
    }
}

/// Renumber children `1..=n` under every labelled node, ordered by current
/// rank order then id. Individual labels follow the new rank; sampling
/// labels are re-derived from the parent label.
pub fn compute_rank_order(batch: &mut Batch) -> Result<(), EngineError> {
    require_label(batch)?;
    rank_children(batch);
    Ok(())
}

fn rank_children(batch: &mut Batch) {
    if !batch.has_label() {
        debug!("skipping rank order of unlabelled batch {:?}", batch.id);
        return;
    }

    batch.children.sort_by(|a, b| {
        cmp_none_last(&a.rank_order, &b.rank_order).then_with(|| cmp_none_last(&a.id, &b.id))
    });

    let parent_label = batch.label().to_string();
    for (index, child) in batch.children.iter_mut().enumerate() {
        let rank = index as i32 + 1;
        child.rank_order = Some(rank);
        if child.is_individual_batch() {
            child.set_label(individual_label(rank));
        } else if child.is_sampling_batch() {
            child.set_label(sampling_label(&parent_label));
        }
        rank_children(child);
    }
}

/// Propagate individual counts upward from individual leaves.
///
/// A sampling batch takes the sum of its individual children. A sorting
/// batch whose own count is lower than the sum is flagged bad; when it has
/// no count, or a higher one, the sum goes to its sampling child.
pub fn compute_individual_count(batch: &mut Batch) -> Result<(), EngineError> {
    require_label(batch)?;
    count_individuals(batch);
    Ok(())
}

fn count_individuals(batch: &mut Batch) {
    if !batch.has_label() {
        debug!("skipping individual count of unlabelled batch {:?}", batch.id);
        return;
    }

    for child in batch.children.iter_mut() {
        count_individuals(child);
    }
    let sum = direct_individual_count(&batch.children);

    if batch.is_sampling_batch() {
        batch.individual_count = sum.filter(|s| *s != 0);
        return;
    }

    let Some(sum) = sum else { return };
    if !batch.is_sorting_batch() {
        return;
    }
    match batch.individual_count {
        Some(count) if count == sum => {}
        Some(count) if count < sum => {
            warn!(
                "invalid individual count of {}: {count} < {sum} measured individuals",
                batch.label()
            );
            batch.quality_flag = QualityFlag::Bad;
        }
        _ => {
            let sampling = batch.get_or_create_sampling_child();
            sampling.individual_count = Some(sum);
        }
    }
}

/// Count carried by the direct individual children, an unset count
/// standing for one. `None` when there are no individual children.
fn direct_individual_count(children: &[Batch]) -> Option<i32> {
    children
        .iter()
        .filter(|child| child.is_individual_batch())
        .map(|child| child.individual_count.unwrap_or(1))
        .reduce(i32::saturating_add)
}

/// Sum of the weights found below one batch.
#[derive(Debug, Clone, PartialEq)]
struct ChildrenWeight {
    value: f64,
    method_id: MethodId,
    /// Methods of the individual weights that went into the sum.
    leaf_methods: Vec<MethodId>,
}

enum SubtreeWeight {
    /// Nothing weighed below this batch.
    Empty,
    /// Some individual lacks a weight, so no sum can be trusted.
    NotExhaustive,
    Sum(ChildrenWeight),
}

/// Weight catalog and rounding defaults used by a weight pass.
pub(crate) struct WeightContext<'a> {
    pub(crate) pmfms: &'a [Pmfm],
    pub(crate) default_decimals: u32,
}

impl WeightContext<'_> {
    fn aggregate_method(leaf_methods: &[MethodId]) -> MethodId {
        if !leaf_methods.is_empty()
            && leaf_methods.iter().all(|m| *m == MethodId::CalculatedWeightLength)
        {
            MethodId::CalculatedWeightLengthSum
        } else {
            MethodId::Calculated
        }
    }

    fn decimals_for(&self, method_id: MethodId) -> u32 {
        self.pmfms
            .iter()
            .find(|p| p.method_id == method_id)
            .and_then(|p| p.maximum_number_decimals)
            .unwrap_or(self.default_decimals)
    }
}

/// Sum weights bottom-up and store each sum as the computed weight of the
/// sampling batch under its parent. Returns the sum found below `batch`.
pub fn compute_weight(
    batch: &mut Batch,
    weight_pmfms: &[Pmfm],
) -> Result<Option<Weight>, EngineError> {
    let ctx = WeightContext {
        pmfms: weight_pmfms,
        default_decimals: batchtree_core::pmfm::DEFAULT_WEIGHT_DECIMALS,
    };
    compute_weight_with(batch, &ctx)
}

pub(crate) fn compute_weight_with(
    batch: &mut Batch,
    ctx: &WeightContext<'_>,
) -> Result<Option<Weight>, EngineError> {
    require_label(batch)?;
    match sum_weights(batch, ctx) {
        SubtreeWeight::Sum(sum) => Ok(Some(Weight::computed(sum.value, sum.method_id))),
        SubtreeWeight::Empty | SubtreeWeight::NotExhaustive => Ok(None),
    }
}

fn sum_weights(batch: &mut Batch, ctx: &WeightContext<'_>) -> SubtreeWeight {
    if !batch.has_label() {
        debug!("skipping weight of unlabelled batch {:?}", batch.id);
        return SubtreeWeight::Empty;
    }

    let mut total = 0.0;
    let mut leaf_methods: Vec<MethodId> = Vec::new();
    let mut contributed = false;
    let mut exhaustive = true;

    for child in batch.children.iter_mut() {
        if !child.children.is_empty() {
            let subtree = sum_weights(child, ctx);
            // Only a sampling child carries its subtree into this sum; other
            // subtrees are weighed on their own.
            if !child.is_sampling_batch() {
                continue;
            }
            match subtree {
                SubtreeWeight::Sum(sum) => {
                    total += sum.value;
                    leaf_methods.extend(sum.leaf_methods);
                    contributed = true;
                }
                SubtreeWeight::NotExhaustive => exhaustive = false,
                SubtreeWeight::Empty => {}
            }
        } else if child.is_individual_batch() && child.is_not_empty(EmptyOptions::default()) {
            let weight = resolve_weight(child, ctx.pmfms);
            match weight.as_ref().and_then(|w| w.value().map(|v| (v, w.method_id))) {
                Some((value, method_id)) => {
                    total += value;
                    leaf_methods.push(method_id.unwrap_or(MethodId::Calculated));
                    contributed = true;
                }
                None => {
                    debug!("no weight on {}, parent sum is not exhaustive", child.label());
                    exhaustive = false;
                }
            }
        }
    }

    if !exhaustive {
        return SubtreeWeight::NotExhaustive;
    }
    if !contributed || total == 0.0 {
        return SubtreeWeight::Empty;
    }

    let method_id = WeightContext::aggregate_method(&leaf_methods);
    let value = round_half_up(total, ctx.decimals_for(method_id));
    let aggregate = Weight::computed(value, method_id);

    let own = resolve_weight(batch, ctx.pmfms);
    match own.as_ref().and_then(|w| w.value().map(|v| (v, w.computed))) {
        Some((own_value, false)) if own_value < value => {
            warn!(
                "invalid weight of {}: {own_value} < {value} summed from children",
                batch.label()
            );
            batch.quality_flag = QualityFlag::Bad;
        }
        _ => {
            let target = if batch.is_sampling_batch() {
                batch
            } else if batch.get_sampling_child().is_some() {
                batch.get_or_create_sampling_child()
            } else {
                // the count pass would give a new sampling child this count
                let count = direct_individual_count(&batch.children).filter(|c| *c != 0);
                let sampling = batch.get_or_create_sampling_child();
                sampling.individual_count = count;
                sampling
            };
            store_computed_weight(target, &aggregate, ctx);
        }
    }

    SubtreeWeight::Sum(ChildrenWeight {
        value,
        method_id,
        leaf_methods,
    })
}

/// Write `aggregate` onto `target` unless it carries a non-computed weight.
fn store_computed_weight(target: &mut Batch, aggregate: &Weight, ctx: &WeightContext<'_>) {
    let current = resolve_weight(target, ctx.pmfms);
    let overwritable = current
        .as_ref()
        .is_none_or(|w| w.computed || w.value().is_none());
    if !overwritable {
        return;
    }

    for pmfm in ctx.pmfms.iter().filter(|p| p.is_computed || p.method_id.is_calculated()) {
        target.measurement_values.remove(pmfm.id);
    }
    if let Some(pmfm) = resolve_weight_pmfm(aggregate, ctx.pmfms)
        && let Some(value) = aggregate.value()
    {
        target.measurement_values.set(pmfm.id, PmfmValue::Numeric(value));
    }
    target.weight = Some(aggregate.clone());
}
