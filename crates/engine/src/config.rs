use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::bucket::Granularity;
use crate::error::EngineError;
use crate::filter::Filters;
use crate::model::Dimension;

// ---------------------------------------------------------------------------
// GroupSpec
// ---------------------------------------------------------------------------

/// The user's grouping choice: an ordered list of 0–2 dimensions, plus a
/// granularity whenever `date` is among them. Empty dimensions are valid and
/// produce a single implicit group holding every row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSpec {
    pub dimensions: Vec<Dimension>,
    pub granularity: Option<Granularity>,
}

impl GroupSpec {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.dimensions.len() > 2 {
            return Err(EngineError::ConfigValidation(format!(
                "at most two grouping dimensions are supported, got {}",
                self.dimensions.len()
            )));
        }
        if self.dimensions.len() == 2 && self.dimensions[0] == self.dimensions[1] {
            return Err(EngineError::ConfigValidation(format!(
                "duplicate grouping dimension '{}'",
                self.dimensions[0]
            )));
        }
        if self.dimensions.contains(&Dimension::Date) && self.granularity.is_none() {
            return Err(EngineError::ConfigValidation(
                "grouping by date requires a granularity".into(),
            ));
        }
        Ok(())
    }

    pub fn primary(&self) -> Option<Dimension> {
        self.dimensions.first().copied()
    }

    pub fn secondary(&self) -> Option<Dimension> {
        self.dimensions.get(1).copied()
    }

    /// The granularity actually in effect: only meaningful while a date
    /// dimension is selected.
    pub fn active_granularity(&self) -> Option<Granularity> {
        if self.dimensions.contains(&Dimension::Date) {
            self.granularity
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// ReportState
// ---------------------------------------------------------------------------

/// The complete, serializable view state of one report: filters, grouping,
/// and which nodes are drilled open. Everything the engine needs is carried
/// here explicitly — there is no hidden state anywhere.
///
/// Each expanded entry is the key path from the root to a node, e.g.
/// `["Acme Corp"]` or `["Acme Corp", "Widget"]`. Collapsing a parent leaves
/// descendant entries in place; they simply have no effect until the parent
/// is expanded again.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportState {
    pub version: u32,
    pub filters: Filters,
    pub group_spec: GroupSpec,
    pub expanded: FxHashSet<Vec<String>>,
}

impl ReportState {
    /// Parse a saved report definition. Validates fail-fast.
    pub fn from_toml(input: &str) -> Result<Self, EngineError> {
        let state: ReportState =
            toml::from_str(input).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
        state.validate()?;
        Ok(state)
    }

    /// Restore a persisted session. Validates fail-fast.
    pub fn from_json(input: &str) -> Result<Self, EngineError> {
        let state: ReportState =
            serde_json::from_str(input).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
        state.validate()?;
        Ok(state)
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        serde_json::to_string_pretty(self).map_err(|e| EngineError::ConfigParse(e.to_string()))
    }

    /// Serialize as a saved report definition.
    pub fn to_toml(&self) -> Result<String, EngineError> {
        toml::to_string(self).map_err(|e| EngineError::ConfigParse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.group_spec.validate()?;
        self.filters.bounds()?;
        Ok(())
    }

    pub fn is_expanded(&self, path: &[String]) -> bool {
        self.expanded.contains(path)
    }

    /// Flip one node's expansion. Returns the new state (true = expanded).
    pub fn toggle_expanded(&mut self, path: &[String]) -> bool {
        if self.expanded.remove(path) {
            false
        } else {
            self.expanded.insert(path.to_vec());
            true
        }
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
