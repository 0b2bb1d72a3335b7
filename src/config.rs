// Copyright 2025 Cowboy AI, LLC.

//! Tunables for verification sampling and report generation
//!
//! Law checks over large categories are sampled, not exhaustive. The caps
//! below bound how many composable triples/pairs are inspected; a passing
//! check therefore only guarantees the sampled set.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CategoryError, CategoryResult};

/// Default cap on associativity triples checked by `Category::verify_axioms`
pub const DEFAULT_MAX_ASSOCIATIVITY_CHECKS: usize = 100;

/// Default cap on composable pairs checked by functor composition law
pub const DEFAULT_MAX_COMPOSITION_CHECKS: usize = 50;

/// Default length of the top-N lists in a report
pub const DEFAULT_TOP_N: usize = 10;

/// Sampling caps for law verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Maximum composable triples `(f, g, h)` checked for associativity
    pub max_associativity_checks: usize,
    /// Maximum composable pairs `(f, g)` checked for `F(g∘f) = F(g)∘F(f)`
    pub max_composition_checks: usize,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            max_associativity_checks: DEFAULT_MAX_ASSOCIATIVITY_CHECKS,
            max_composition_checks: DEFAULT_MAX_COMPOSITION_CHECKS,
        }
    }
}

/// Report shaping options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Number of entries in `top_unstable` and `top_coupled`
    pub top_n: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { top_n: DEFAULT_TOP_N }
    }
}

/// Complete analysis configuration, usually loaded from a TOML file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Law verification sampling
    pub verification: VerificationConfig,
    /// Report shaping
    pub report: ReportConfig,
}

impl AnalysisConfig {
    /// Parse a configuration from TOML text; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> CategoryResult<Self> {
        toml::from_str(text).map_err(|e| CategoryError::Configuration(e.to_string()))
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> CategoryResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CategoryError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }
}
