//! `careplan artifacts` -- load-check the model artifacts listed in a manifest.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};

use careplan_core::artifacts::{ArtifactManifest, ArtifactRegistry, ArtifactStore};

/// Load every artifact in `manifest_path` and print one line per entry.
///
/// Relative paths resolve against `base_dir`, or the manifest's own
/// directory when none is given.
pub fn run_artifacts(
    manifest_path: &Path,
    base_dir: Option<&Path>,
    require_all: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let content = std::fs::read_to_string(manifest_path)
        .with_context(|| format!("failed to read manifest: {}", manifest_path.display()))?;
    let manifest = ArtifactManifest::from_toml(&content)
        .with_context(|| format!("failed to parse manifest: {}", manifest_path.display()))?;

    let base = match base_dir {
        Some(dir) => dir.to_path_buf(),
        None => manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    let store = ArtifactStore::new(base);
    let registry = store.load_manifest(&manifest);

    writeln!(out, "Artifacts under {}:", store.base_dir().display())?;
    print_registry(&registry, out)?;

    let missing = registry.missing();
    if require_all && !missing.is_empty() {
        bail!("missing artifacts: {}", missing.join(", "));
    }
    Ok(())
}

fn print_registry(registry: &ArtifactRegistry, out: &mut dyn Write) -> Result<()> {
    if registry.entries().is_empty() {
        writeln!(out, "No artifacts listed in manifest.")?;
        return Ok(());
    }

    let name_w = registry
        .entries()
        .iter()
        .map(|(n, _)| n.len())
        .max()
        .unwrap_or(4);

    for (name, artifact) in registry.entries() {
        match artifact {
            Some(a) => writeln!(
                out,
                "  [ok] {name:<name_w$}  {:>10} bytes  sha256:{}",
                a.bytes.len(),
                &a.sha256[..12],
            )?,
            None => writeln!(out, "  [--] {name:<name_w$}  not loaded")?,
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "{} of {} artifacts loaded.",
        registry.loaded_count(),
        registry.entries().len()
    )?;
    Ok(())
}
