use serde::{Deserialize, Serialize};

use batchtree_core::{BatchId, MeasurementValues, QualityFlag, ReferentialId, Weight};

use crate::label::{sampling_label, AcquisitionLevel, BatchKind};

/// Taxon group or taxon name reference. Opaque to the engine apart from
/// emptiness and display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonRef {
    #[serde(default)]
    pub id: Option<ReferentialId>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl TaxonRef {
    pub fn labelled(label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.label.as_deref().is_none_or(|l| l.trim().is_empty())
    }

    pub fn display(&self) -> String {
        match (&self.label, &self.name) {
            (Some(label), Some(name)) => format!("{label} - {name}"),
            (Some(label), None) => label.clone(),
            (None, Some(name)) => name.clone(),
            (None, None) => self.id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyOptions {
    pub ignore_children: bool,
    pub ignore_taxon_group: bool,
    pub ignore_taxon_name: bool,
}

impl EmptyOptions {
    /// Own values only: children, taxon group and taxon name are ignored.
    pub fn own_values() -> Self {
        Self {
            ignore_children: true,
            ignore_taxon_group: true,
            ignore_taxon_name: true,
        }
    }
}

/// One node of a catch batch tree. Children are owned; the parent link
/// only exists on the wire, as `parent_id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub id: Option<BatchId>,
    pub parent_id: Option<BatchId>,
    pub operation_id: Option<i64>,
    label: String,
    kind: BatchKind,
    pub rank_order: Option<i32>,
    pub individual_count: Option<i32>,
    pub weight: Option<Weight>,
    pub children_weight: Option<Weight>,
    pub sampling_ratio: Option<f64>,
    pub sampling_ratio_text: Option<String>,
    pub exhaustive_inventory: Option<bool>,
    pub taxon_group: Option<TaxonRef>,
    pub taxon_name: Option<TaxonRef>,
    pub comments: Option<String>,
    pub measurement_values: MeasurementValues,
    pub quality_flag: QualityFlag,
    pub children: Vec<Batch>,
}

impl Batch {
    pub fn new(label: impl Into<String>) -> Self {
        let mut batch = Self::default();
        batch.set_label(label);
        batch
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> BatchKind {
        self.kind
    }

    /// Replace the label, keeping the kind in sync.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
        self.kind = BatchKind::from_label(&self.label);
    }

    pub fn has_label(&self) -> bool {
        !self.label.is_empty()
    }

    pub fn is_catch_batch(&self) -> bool {
        self.kind == BatchKind::Catch
    }

    pub fn is_sorting_batch(&self) -> bool {
        self.kind == BatchKind::Sorting
    }

    pub fn is_individual_batch(&self) -> bool {
        self.kind == BatchKind::Individual
    }

    pub fn is_sampling_batch(&self) -> bool {
        self.kind == BatchKind::Sampling
    }

    pub fn sampling_label(&self) -> String {
        sampling_label(&self.label)
    }

    pub fn get_sampling_child(&self) -> Option<&Batch> {
        let label = self.sampling_label();
        self.children.iter().find(|c| c.label == label)
    }

    /// Return the sampling child, creating it when missing. A new sampling
    /// child takes over all current children and becomes the only child.
    pub fn get_or_create_sampling_child(&mut self) -> &mut Batch {
        let label = self.sampling_label();
        if let Some(index) = self.children.iter().position(|c| c.label == label) {
            return &mut self.children[index];
        }

        tracing::debug!("creating sampling batch {label}");
        let mut sampling = Batch::new(label);
        sampling.rank_order = Some(1);
        sampling.parent_id = self.id;
        sampling.operation_id = self.operation_id;
        sampling.children = std::mem::take(&mut self.children);
        self.children.push(sampling);
        &mut self.children[0]
    }

    /// Descendants at `level`, without descending into a match.
    pub fn get_children_by_level(&self, level: AcquisitionLevel) -> Vec<&Batch> {
        let mut found = Vec::new();
        for child in &self.children {
            if level.matches(&child.label) {
                found.push(child);
            } else {
                found.extend(child.get_children_by_level(level));
            }
        }
        found
    }

    pub fn has_children_with_level(&self, level: AcquisitionLevel) -> bool {
        self.children
            .iter()
            .any(|c| level.matches(&c.label) || c.has_children_with_level(level))
    }

    pub fn is_not_empty(&self, opts: EmptyOptions) -> bool {
        let has_taxon = |taxon: &Option<TaxonRef>| taxon.as_ref().is_some_and(|t| !t.is_empty());
        self.individual_count.is_some()
            || (!opts.ignore_taxon_group && has_taxon(&self.taxon_group))
            || (!opts.ignore_taxon_name && has_taxon(&self.taxon_name))
            || self.sampling_ratio.is_some_and(|r| !r.is_nan())
            || self.weight.as_ref().and_then(Weight::value).is_some()
            || !self.measurement_values.is_empty()
            || (!opts.ignore_children && self.children.iter().any(|c| c.is_not_empty(opts)))
    }

    pub fn is_empty(&self, opts: EmptyOptions) -> bool {
        !self.is_not_empty(opts)
    }

    /// Short display text: taxon name alone, `group / name`, group alone,
    /// or `#rank` when the batch has no taxon.
    pub fn parent_to_string(&self) -> String {
        let group = self.taxon_group.as_ref().filter(|t| !t.is_empty());
        let name = self.taxon_name.as_ref().filter(|t| !t.is_empty());
        match (group, name) {
            (Some(group), Some(name)) if group.label != name.label => {
                format!("{} / {}", group.display(), name.display())
            }
            (_, Some(name)) => name.display(),
            (Some(group), None) => group.display(),
            (None, None) => {
                let rank = self.rank_order.map(|r| r.to_string()).unwrap_or_default();
                format!("#{rank}")
            }
        }
    }

    /// Depth-first pre-order visit of this batch and its descendants.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Batch)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Sum of observed individuals: individual leaves count for their
/// individual count (1 when unset), other leaves for nothing.
pub fn sum_observed_individual_count(batches: &[Batch]) -> i32 {
    batches
        .iter()
        .map(|b| {
            if !b.children.is_empty() {
                sum_observed_individual_count(&b.children)
            } else if b.is_individual_batch() {
                b.individual_count.unwrap_or(1)
            } else {
                0
            }
        })
        .sum()
}
