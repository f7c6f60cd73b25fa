//! Solidity compiler settings.

use crate::error::ConfigError;

pub const SOLC_VERSION: &str = "0.8.9";
pub const OPTIMIZER_RUNS: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizerSettings {
    pub enabled: bool,
    /// Only consulted when `enabled` is true.
    pub runs: u32,
}

impl OptimizerSettings {
    /// Runs the compiler will actually use, if optimizing at all
    pub fn effective_runs(&self) -> Option<u32> {
        self.enabled.then_some(self.runs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerSpec {
    pub version: String,
    pub optimizer: OptimizerSettings,
}

impl Default for CompilerSpec {
    fn default() -> Self {
        Self {
            version: SOLC_VERSION.to_string(),
            optimizer: OptimizerSettings {
                enabled: true,
                runs: OPTIMIZER_RUNS,
            },
        }
    }
}

impl CompilerSpec {
    /// Check that `version` is a plain `MAJOR.MINOR.PATCH` triple
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parts: Vec<&str> = self.version.split('.').collect();
        let well_formed = parts.len() == 3
            && parts
                .iter()
                .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));

        if !well_formed {
            return Err(ConfigError::validation(format!(
                "compiler version must be MAJOR.MINOR.PATCH: {}",
                self.version
            )));
        }
        Ok(())
    }
}
