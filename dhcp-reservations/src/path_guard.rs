use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Refuse an export destination that resolves to the configuration file.
pub fn ensure_not_config(output: &Path, config: &Path) -> Result<()> {
    let out_norm = absolute(output)
        .with_context(|| format!("failed to resolve output path {}", output.display()))?;
    let config_norm = absolute(config)
        .with_context(|| format!("failed to resolve config path {}", config.display()))?;

    if out_norm == config_norm {
        bail!(
            "refusing to overwrite the configuration file: output {} is {}",
            output.display(),
            config.display()
        );
    }
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("canonicalize {}", path.display()));
    }

    // `..` is not resolved for paths that do not exist yet.
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir().context("current_dir")?.join(path))
}
