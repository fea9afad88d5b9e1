pub mod aggregation;
pub mod cleanup;
pub mod config;
pub mod converter;
pub mod error;
pub mod weight;

pub use aggregation::{compute_individual_count, compute_rank_order, compute_weight};
pub use cleanup::clean_tree;
pub use config::EngineConfig;
pub use converter::{
    array_to_tree, batch_tree_from_array, batch_tree_to_array, compute_tree_indent,
    filter_recursively, filter_tree_components, lift_sampling_values, prepare_report_tree,
    tree_to_array, IndentGlyphs, IndentOptions,
};
pub use error::EngineError;
pub use weight::{resolve_weight, resolve_weight_pmfm};

use tracing::debug;

use batchtree_core::{Pmfm, Weight};
use batchtree_model::{log_tree, Batch};

use crate::aggregation::{compute_weight_with, WeightContext};

/// Runs the batch tree passes against one weight PMFM catalog.
#[derive(Debug, Clone, Default)]
pub struct BatchTreeEngine {
    config: EngineConfig,
}

impl BatchTreeEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn from_toml_str(source: &str) -> Result<Self, EngineError> {
        Ok(Self {
            config: EngineConfig::from_toml_str(source)?,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn weight_pmfms(&self) -> &[Pmfm] {
        &self.config.weight_pmfms
    }

    fn weight_context(&self) -> WeightContext<'_> {
        WeightContext {
            pmfms: &self.config.weight_pmfms,
            default_decimals: self.config.default_weight_decimals,
        }
    }

    pub fn resolve_weight(&self, batch: &Batch) -> Option<Weight> {
        resolve_weight(batch, self.weight_pmfms())
    }

    pub fn compute_weight(&self, batch: &mut Batch) -> Result<Option<Weight>, EngineError> {
        compute_weight_with(batch, &self.weight_context())
    }

    /// Individual counts first, then weights.
    pub fn compute_tree(&self, batch: &mut Batch) -> Result<(), EngineError> {
        compute_individual_count(batch)?;
        self.compute_weight(batch)?;
        Ok(())
    }

    /// Prepare a tree for saving: drop empty batches, renumber, then
    /// aggregate. Returns false when nothing is left to save.
    pub fn prepare_for_save(&self, root: &mut Batch) -> Result<bool, EngineError> {
        if clean_tree(root) {
            debug!("batch tree {} is empty", root.label());
            return Ok(false);
        }
        compute_rank_order(root)?;
        self.compute_tree(root)?;
        log_tree(root);
        Ok(true)
    }
}
