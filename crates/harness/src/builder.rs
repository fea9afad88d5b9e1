use batchtree_core::{pmfm_ids, BatchId, MethodId, PmfmId, PmfmValue, Weight};
use batchtree_model::label::{individual_label, sampling_label};
use batchtree_model::{parse_sampling_ratio, Batch, TaxonRef, SAMPLING_BATCH_SUFFIX};

/// Fluent construction of catch batch trees for tests.
///
/// ```ignore
/// let root = TreeBuilder::catch()
///     .sorting("COD", |s| s.individual(0.5).individual(0.5))
///     .build();
/// ```
pub struct TreeBuilder {
    root: Batch,
}

impl TreeBuilder {
    pub fn catch() -> Self {
        Self {
            root: Batch::new("CATCH_BATCH"),
        }
    }

    /// Add a `SORTING_BATCH#n` child for a taxon group.
    pub fn sorting(
        mut self,
        taxon_group: &str,
        build: impl FnOnce(SortingBuilder) -> SortingBuilder,
    ) -> Self {
        let rank = self.root.children.len() as i32 + 1;
        let mut sorting = SortingBuilder::new(format!("SORTING_BATCH#{rank}"), rank);
        sorting.batch.taxon_group = Some(TaxonRef::labelled(taxon_group));
        self.root.children.push(build(sorting).batch);
        self
    }

    /// The tree, without ids.
    pub fn build_without_ids(self) -> Batch {
        self.root
    }

    /// The tree with ids `1..` in pre-order and matching parent ids.
    pub fn build(self) -> Batch {
        let mut root = self.root;
        let mut next_id = 1;
        assign_ids(&mut root, None, &mut next_id);
        root
    }
}

fn assign_ids(batch: &mut Batch, parent_id: Option<BatchId>, next_id: &mut i64) {
    let id = BatchId::new(*next_id);
    *next_id += 1;
    batch.id = Some(id);
    batch.parent_id = parent_id;
    for child in batch.children.iter_mut() {
        assign_ids(child, Some(id), next_id);
    }
}

pub struct SortingBuilder {
    batch: Batch,
}

impl SortingBuilder {
    fn new(label: String, rank: i32) -> Self {
        let mut batch = Batch::new(label);
        batch.rank_order = Some(rank);
        Self { batch }
    }

    fn next_rank(&self) -> i32 {
        self.batch.children.len() as i32 + 1
    }

    fn push_individual(mut self, measurement: Option<(PmfmId, f64)>) -> Self {
        let rank = self.next_rank();
        let mut individual = Batch::new(individual_label(rank));
        individual.rank_order = Some(rank);
        individual.individual_count = Some(1);
        if let Some((pmfm_id, value)) = measurement {
            individual
                .measurement_values
                .set(pmfm_id, PmfmValue::Numeric(value));
        }
        self.batch.children.push(individual);
        self
    }

    /// An individual with a measured weight.
    pub fn individual(self, weight: f64) -> Self {
        self.push_individual(Some((pmfm_ids::BATCH_MEASURED_WEIGHT, weight)))
    }

    /// An individual with a weight computed from its length.
    pub fn length_weight_individual(self, weight: f64) -> Self {
        self.push_individual(Some((pmfm_ids::BATCH_CALCULATED_WEIGHT_LENGTH, weight)))
    }

    /// An individual that was counted but not weighed.
    pub fn unweighed_individual(self) -> Self {
        self.push_individual(None)
    }

    pub fn individual_count(mut self, count: i32) -> Self {
        self.batch.individual_count = Some(count);
        self
    }

    /// Observed total weight of this batch.
    pub fn weight(mut self, value: f64) -> Self {
        self.batch.weight = Some(Weight::new(value, MethodId::MeasuredByObserver, false));
        self
    }

    pub fn taxon_name(mut self, name: &str) -> Self {
        self.batch.taxon_name = Some(TaxonRef::labelled(name));
        self
    }

    /// Add the sampling child, built like a sorting batch.
    pub fn sampling(
        mut self,
        ratio_text: &str,
        build: impl FnOnce(SortingBuilder) -> SortingBuilder,
    ) -> Self {
        let mut sampling = SortingBuilder::new(sampling_label(self.batch.label()), 1);
        sampling.batch.sampling_ratio = parse_sampling_ratio(ratio_text);
        sampling.batch.sampling_ratio_text = Some(ratio_text.to_string());
        self.batch.children.push(build(sampling).batch);
        self
    }

    /// Add a sorting sub-batch labelled `<parent>.<n>`.
    pub fn sorting(mut self, build: impl FnOnce(SortingBuilder) -> SortingBuilder) -> Self {
        let rank = self.next_rank();
        let parent = self.batch.label().trim_end_matches(SAMPLING_BATCH_SUFFIX);
        let label = format!("{parent}.{rank}");
        self.batch.children.push(build(SortingBuilder::new(label, rank)).batch);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_labelled_tree_with_ids() {
        let root = TreeBuilder::catch()
            .sorting("COD", |s| s.individual(0.5).unweighed_individual())
            .sorting("HAD", |s| {
                s.sampling("50%", |sc| sc.sorting(|sub| sub.individual(1.0)))
            })
            .build();

        assert_eq!(root.id, Some(BatchId::new(1)));
        let cod = &root.children[0];
        assert_eq!(cod.label(), "SORTING_BATCH#1");
        assert_eq!(cod.parent_id, Some(BatchId::new(1)));
        assert_eq!(cod.children[1].label(), "SORTING_BATCH_INDIVIDUAL#2");
        assert!(cod.children[1].measurement_values.is_empty());

        let had = &root.children[1];
        let sampling = had.get_sampling_child().unwrap();
        assert_eq!(sampling.label(), "SORTING_BATCH#2.%");
        assert_eq!(sampling.sampling_ratio, Some(0.5));
        assert_eq!(sampling.children[0].label(), "SORTING_BATCH#2.1");
        assert!(sampling.children[0].is_sorting_batch());
        assert_eq!(sampling.children[0].id, Some(BatchId::new(7)));
    }
}
