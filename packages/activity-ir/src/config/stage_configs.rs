//! Per-phase configuration
//!
//! One struct per analysis phase. Each carries `validate()`, builder-style
//! setters and a `from_preset` constructor.

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;

// ============================================================================
// Graph Builder
// ============================================================================

/// Graph builder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuilderConfig {
    /// Maximum DUG nodes before the build aborts (1..=10_000_000)
    pub max_nodes: usize,
}

impl BuilderConfig {
    pub const MAX_NODES_LIMIT: usize = 10_000_000;

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_nodes == 0 || self.max_nodes > Self::MAX_NODES_LIMIT {
            return Err(ConfigError::range_with_hint(
                "builder.max_nodes",
                self.max_nodes,
                1,
                Self::MAX_NODES_LIMIT,
                "DUG node limit must be reasonable",
            ));
        }
        Ok(())
    }

    /// Builder: Set max_nodes
    pub fn max_nodes(mut self, v: usize) -> Self {
        self.max_nodes = v;
        self
    }

    /// Create from preset
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self { max_nodes: 50_000 },
            Preset::Balanced => Self { max_nodes: 1_000_000 },
            Preset::Thorough => Self {
                max_nodes: Self::MAX_NODES_LIMIT,
            },
        }
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

// ============================================================================
// Dependence-Matrix Closure
// ============================================================================

/// How the per-procedure closures are propagated over the call graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureStrategy {
    /// One bottom-up sweep, callees before callers. Mutually recursive
    /// procedures may be under-approximated.
    SingleSweep,

    /// Repeat the sweep until no caller matrix changes
    Fixpoint,
}

impl Default for ClosureStrategy {
    fn default() -> Self {
        ClosureStrategy::SingleSweep
    }
}

/// Closure configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClosureConfig {
    /// Propagation strategy (default: single sweep)
    pub strategy: ClosureStrategy,

    /// Sweep budget for `Fixpoint` (1..=1000); ignored for `SingleSweep`
    pub max_fixpoint_rounds: usize,
}

impl ClosureConfig {
    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_fixpoint_rounds == 0 || self.max_fixpoint_rounds > 1000 {
            return Err(ConfigError::range_with_hint(
                "closure.max_fixpoint_rounds",
                self.max_fixpoint_rounds,
                1,
                1000,
                "Fixpoint sweeps are bounded by call-graph depth; 1000 is plenty",
            ));
        }
        Ok(())
    }

    /// Builder: Set strategy
    pub fn strategy(mut self, v: ClosureStrategy) -> Self {
        self.strategy = v;
        self
    }

    /// Builder: Set max_fixpoint_rounds
    pub fn max_fixpoint_rounds(mut self, v: usize) -> Self {
        self.max_fixpoint_rounds = v;
        self
    }

    /// Create from preset
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast | Preset::Balanced => Self {
                strategy: ClosureStrategy::SingleSweep,
                max_fixpoint_rounds: 10,
            },
            Preset::Thorough => Self {
                strategy: ClosureStrategy::Fixpoint,
                max_fixpoint_rounds: 100,
            },
        }
    }
}

impl Default for ClosureConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}
