//! Artifact working set
//!
//! The consumer's only shared mutable resource: the tabs materialized
//! from successful generations. Persisted as a project JSON file; each
//! artifact round-trips `{name, code, config}` losslessly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StudioResult;
use crate::types::Artifact;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub name: String,
    artifacts: Vec<Artifact>,
}

impl Workspace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artifacts: Vec::new(),
        }
    }

    /// Append one materialized artifact, surfacing it immediately.
    pub fn add_artifact(&mut self, artifact: Artifact) {
        tracing::info!(name = %artifact.name, "materialized artifact");
        self.artifacts.push(artifact);
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn export(&self) -> StudioResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn import(json: &str) -> StudioResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: &Path) -> StudioResult<()> {
        std::fs::write(path, self.export()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> StudioResult<Self> {
        Self::import(&std::fs::read_to_string(path)?)
    }
}
