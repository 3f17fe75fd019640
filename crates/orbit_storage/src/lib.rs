pub mod error;

pub use error::{SnapshotError, SnapshotResult};

use chrono::{SecondsFormat, Utc};
use orbit_core::config::{unscale_rotation_speed, unscale_wiggle_speed};
use orbit_core::{HexColor, OrbitConfig, Palette, Param, SNAPSHOT_VERSION};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Exported parameter set. Speeds are in simulation units, not UI scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub config: OrbitConfig,
    pub colors: Vec<HexColor>,
    /// ISO-8601 UTC creation time
    pub timestamp: String,
    pub version: String,
}

impl Snapshot {
    pub fn capture(config: &OrbitConfig, palette: &Palette) -> Self {
        Self {
            config: config.to_internal_units(),
            colors: palette.colors().to_vec(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            version: SNAPSHOT_VERSION.to_string(),
        }
    }

    pub fn to_json(&self) -> SnapshotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Serialize the live configuration and palette to snapshot text
pub fn export_snapshot(config: &OrbitConfig, palette: &Palette) -> SnapshotResult<String> {
    Snapshot::capture(config, palette).to_json()
}

/// Snapshot text that passed every check and can be applied atomically
#[derive(Debug, Clone)]
pub struct ValidatedImport {
    /// Numeric values found for known keys, speeds back on the UI scale
    values: Vec<(Param, f64)>,
    palette: Palette,
    /// Required keys absent from the imported config
    missing_keys: Vec<&'static str>,
}

impl ValidatedImport {
    pub fn values(&self) -> &[(Param, f64)] {
        &self.values
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn missing_keys(&self) -> &[&'static str] {
        &self.missing_keys
    }

    /// Overwrite the live state. Returns how many config values were applied.
    pub fn apply_to(self, config: &mut OrbitConfig, palette: &mut Palette) -> usize {
        for &(param, value) in &self.values {
            config.set(param, value);
        }
        *palette = self.palette;
        self.values.len()
    }
}

/// Parse and validate untrusted snapshot text without touching live state.
///
/// Text around the outermost `{ ... }` is ignored, so a snapshot pasted with
/// a leading label still imports. Non-numeric and unknown config keys are
/// skipped silently.
pub fn parse_snapshot(text: &str) -> SnapshotResult<ValidatedImport> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SnapshotError::Format("snapshot text is empty".to_string()));
    }

    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(SnapshotError::Format("no JSON object found".to_string()));
    };
    if end < start {
        return Err(SnapshotError::Format("no JSON object found".to_string()));
    }

    let root: Value = serde_json::from_str(&text[start..=end])
        .map_err(|e| SnapshotError::Format(format!("invalid JSON: {e}")))?;

    let (Some(config), Some(colors)) = (
        root.get("config").and_then(Value::as_object),
        root.get("colors").and_then(Value::as_array),
    ) else {
        return Err(SnapshotError::Schema(
            "missing config object or colors array".to_string(),
        ));
    };

    let mut values = Vec::new();
    let mut missing_keys = Vec::new();
    for param in Param::ALL {
        match config.get(param.name()) {
            None if param.is_required() => missing_keys.push(param.name()),
            None => {}
            Some(value) => {
                if let Some(number) = value.as_f64() {
                    values.push((param, to_ui_scale(param, number)));
                }
            }
        }
    }

    if colors.is_empty() {
        return Err(SnapshotError::Schema("colors array cannot be empty".to_string()));
    }

    let mut parsed = Vec::with_capacity(colors.len());
    let mut invalid = Vec::new();
    for (i, entry) in colors.iter().enumerate() {
        match entry.as_str().and_then(HexColor::parse) {
            Some(color) => parsed.push(color),
            None => invalid.push(format!("#{i} = {entry}")),
        }
    }
    if !invalid.is_empty() {
        return Err(SnapshotError::Format(format!(
            "invalid color format ({}); colors must be hex codes like #FF0000",
            invalid.join(", ")
        )));
    }

    let palette = Palette::new(parsed)
        .ok_or_else(|| SnapshotError::Schema("colors array cannot be empty".to_string()))?;

    Ok(ValidatedImport {
        values,
        palette,
        missing_keys,
    })
}

fn to_ui_scale(param: Param, value: f64) -> f64 {
    match param {
        Param::WiggleSpeed => unscale_wiggle_speed(value),
        Param::RotationSpeed => unscale_rotation_speed(value),
        _ => value,
    }
}

/// File name for a snapshot taken now, sortable by time
pub fn snapshot_file_name() -> String {
    format!("orbit-{}.json", Utc::now().format("%Y%m%dT%H%M%S%3fZ"))
}

/// Write snapshot text to disk, creating parent directories
pub fn write_snapshot(path: &Path, text: &str) -> SnapshotResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SnapshotError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, text).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_snapshot(path: &Path) -> SnapshotResult<String> {
    fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Most recently modified `.json` file in `dir`
pub fn latest_snapshot(dir: &Path) -> Option<PathBuf> {
    fs::read_dir(dir).ok().and_then(|entries| {
        entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
            .max_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()))
            .map(|e| e.path())
    })
}
