//! Loading of serialized prediction-model artifacts.
//!
//! Artifacts are opaque files resolved against a base directory. Loading
//! never fails: a missing or unreadable file is logged and yields `None`, so
//! callers decide for themselves whether a given model is required.
//!
//! A manifest lists the artifacts to load:
//!
//! ```toml
//! [[artifacts]]
//! name = "diabetes_subtype_classifier"
//! path = "diabetes_class/lgbm_classifier.pkl"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sha2::{Digest, Sha256};

/// A loaded artifact file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelArtifact {
    pub name: String,
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    /// Hex-encoded SHA-256 of `bytes`.
    pub sha256: String,
}

/// One entry in an artifact manifest.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ArtifactSpec {
    pub name: String,
    /// Path relative to the store's base directory.
    pub path: PathBuf,
}

/// Container for deserializing a manifest file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ArtifactManifest {
    #[serde(default)]
    pub artifacts: Vec<ArtifactSpec>,
}

impl ArtifactManifest {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Results of loading every artifact in a manifest, in manifest order.
#[derive(Debug, Default)]
pub struct ArtifactRegistry {
    entries: Vec<(String, Option<ModelArtifact>)>,
}

impl ArtifactRegistry {
    pub fn get(&self, name: &str) -> Option<&ModelArtifact> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, a)| a.as_ref())
    }

    pub fn entries(&self) -> &[(String, Option<ModelArtifact>)] {
        &self.entries
    }

    pub fn loaded_count(&self) -> usize {
        self.entries.iter().filter(|(_, a)| a.is_some()).count()
    }

    /// Names whose artifact could not be loaded.
    pub fn missing(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, a)| a.is_none())
            .map(|(n, _)| n.as_str())
            .collect()
    }
}

/// Loads artifacts relative to a base directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    base_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Load one artifact, logging the outcome. Returns `None` on any failure.
    pub fn load(&self, name: &str, relative_path: &Path) -> Option<ModelArtifact> {
        let path = self.base_dir.join(relative_path);

        if !path.exists() {
            tracing::error!(name, path = %path.display(), "artifact file not found");
            return None;
        }

        match std::fs::read(&path) {
            Ok(bytes) => {
                let sha256 = hex::encode(Sha256::digest(&bytes));
                tracing::info!(
                    name,
                    path = %path.display(),
                    size = bytes.len(),
                    sha256 = %sha256,
                    "artifact loaded"
                );
                Some(ModelArtifact {
                    name: name.to_string(),
                    path,
                    bytes,
                    sha256,
                })
            }
            Err(e) => {
                tracing::error!(name, path = %path.display(), error = %e, "failed to load artifact");
                None
            }
        }
    }

    /// Load every artifact listed in `manifest`.
    pub fn load_manifest(&self, manifest: &ArtifactManifest) -> ArtifactRegistry {
        let entries: Vec<(String, Option<ModelArtifact>)> = manifest
            .artifacts
            .iter()
            .map(|spec| (spec.name.clone(), self.load(&spec.name, &spec.path)))
            .collect();

        let registry = ArtifactRegistry { entries };
        tracing::info!(
            loaded = registry.loaded_count(),
            total = manifest.artifacts.len(),
            "artifact loading finished"
        );
        registry
    }
}
