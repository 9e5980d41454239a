//! Stage 5 (emission): writes transformed lines to their renamed output
//! path and the mapping artifacts, honoring the overwrite/dry-run/
//! validate-only contract of spec.md §5.

use std::path::{Path, PathBuf};

use cobol_anonymize_mapping::MappingTable;

use crate::error::{Error, Result};

/// Prepares `output_dir` for writing. No-op under `dry_run`/
/// `validate_only` (spec.md §5: "skip this check and never write"). If
/// the directory is non-empty and `overwrite` is false, refuses. If
/// `overwrite` is true, clears it recursively first.
pub fn prepare_output_dir(output_dir: &Path, overwrite: bool, dry_run: bool, validate_only: bool) -> Result<()> {
    if dry_run || validate_only {
        return Ok(());
    }

    if output_dir.exists() {
        let non_empty = std::fs::read_dir(output_dir)
            .map_err(|source| Error::Io {
                path: output_dir.display().to_string(),
                source,
            })?
            .next()
            .is_some();
        if non_empty {
            if !overwrite {
                return Err(Error::OutputNotEmpty {
                    path: output_dir.display().to_string(),
                });
            }
            std::fs::remove_dir_all(output_dir).map_err(|source| Error::Io {
                path: output_dir.display().to_string(),
                source,
            })?;
        }
    }

    std::fs::create_dir_all(output_dir).map_err(|source| Error::Io {
        path: output_dir.display().to_string(),
        source,
    })
}

/// Writes one file's already-transformed lines to `output_dir/anonymized_name`.
/// No-op under `dry_run`/`validate_only`.
pub fn write_file(
    output_dir: &Path,
    anonymized_name: &str,
    lines: &[String],
    dry_run: bool,
    validate_only: bool,
) -> Result<PathBuf> {
    let output_path = output_dir.join(anonymized_name);
    if dry_run || validate_only {
        return Ok(output_path);
    }

    let body = if lines.is_empty() {
        String::new()
    } else {
        format!("{}\n", lines.join("\n"))
    };
    std::fs::write(&output_path, body).map_err(|source| Error::Io {
        path: output_path.display().to_string(),
        source,
    })?;
    Ok(output_path)
}

/// Writes `mappings.json` and `mappings.csv` into `output_dir`, per
/// spec.md §6's exact schemas (both delegated to the mapping table's own
/// writers, which already produce that shape).
pub fn write_mapping_artifacts(output_dir: &Path, mapping: &MappingTable) -> Result<()> {
    mapping
        .save_json(&output_dir.join("mappings.json"))
        .map_err(Error::from)?;
    mapping
        .save_csv(&output_dir.join("mappings.csv"))
        .map_err(Error::from)?;
    Ok(())
}

/// Derives the output filename for a renamed program/copybook: the
/// mapped (or original, if external/unmapped) uppercase stem plus the
/// original extension, lowercased.
pub fn anonymized_file_name(original_name: &str, mapping: &MappingTable) -> String {
    let path = Path::new(original_name);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(original_name);
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let new_stem = mapping
        .get(stem)
        .map(|entry| entry.anonymized_name.clone())
        .unwrap_or_else(|| stem.to_string());

    if ext.is_empty() {
        new_stem
    } else {
        format!("{new_stem}.{ext}")
    }
}
