use serde::Deserialize;

use batchtree_core::pmfm::DEFAULT_WEIGHT_DECIMALS;
use batchtree_core::Pmfm;

use crate::error::EngineError;

/// Engine settings. Every field has a default, so an empty TOML document
/// is a valid configuration.
///
/// ```toml
/// default_weight_decimals = 3
///
/// [[weight_pmfms]]
/// id = 91
/// type = "double"
/// methodId = 1
/// maximumNumberDecimals = 3
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Weight PMFM candidates, in resolution priority order.
    pub weight_pmfms: Vec<Pmfm>,
    /// Rounding precision when the aggregate PMFM declares none.
    pub default_weight_decimals: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weight_pmfms: Pmfm::default_weight_pmfms(),
            default_weight_decimals: DEFAULT_WEIGHT_DECIMALS,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, EngineError> {
        let config: EngineConfig =
            toml::from_str(source).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.weight_pmfms.is_empty() {
            return Err(EngineError::Config("weight_pmfms must not be empty".into()));
        }
        if let Some(pmfm) = self.weight_pmfms.iter().find(|p| !p.pmfm_type.is_numeric()) {
            return Err(EngineError::Config(format!(
                "weight pmfm {} is not numeric",
                pmfm.id
            )));
        }
        Ok(())
    }
}
