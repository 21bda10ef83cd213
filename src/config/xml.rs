//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Writes a commented template on request (`--init-config`).
//!
//! Notes:
//! - This module only reads/writes the config file; root validation happens elsewhere.
//! - Unknown XML fields are rejected so typos surface instead of being silently ignored.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
use crate::config::types::{Config, LogLevel};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(rename = "source_path")]
    source_path: Option<String>,
    #[serde(rename = "destination_path")]
    destination_path: Option<String>,
    #[serde(rename = "paths_list_file")]
    paths_list_file: Option<String>,
    #[serde(rename = "exclude_source_paths_file")]
    exclude_source_paths_file: Option<String>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    rename_files: Option<bool>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    delete_empty_dirs: Option<bool>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    delete_copied_files: Option<bool>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    ignore_excluded_paths: Option<bool>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    force_overwrite: Option<bool>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    disable_recursion: Option<bool>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    preserve_timestamps: Option<bool>,
    #[serde(rename = "log_level")]
    log_level: Option<String>,
    #[serde(rename = "log_file")]
    log_file: Option<String>,
}

// Booleans arrive as element text; tolerate padding and yes/no spellings.
fn de_bool_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }))
}

fn non_empty_path(s: Option<&str>) -> Option<PathBuf> {
    s.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(PathBuf::from)
}

// Map XmlConfig -> Config, keeping defaults for anything left out.
fn xml_to_config(parsed: XmlConfig) -> Config {
    let mut cfg = Config::default();

    cfg.source_root = non_empty_path(parsed.source_path.as_deref());
    cfg.destination_root = non_empty_path(parsed.destination_path.as_deref());
    cfg.paths_list_file = non_empty_path(parsed.paths_list_file.as_deref());
    cfg.exclude_list_file = non_empty_path(parsed.exclude_source_paths_file.as_deref());
    if let Some(lf) = non_empty_path(parsed.log_file.as_deref()) {
        cfg.log_file = Some(lf);
    }
    if let Some(level) = parsed
        .log_level
        .as_deref()
        .and_then(|s| s.trim().parse::<LogLevel>().ok())
    {
        cfg.log_level = level;
    }

    cfg.rename_files = parsed.rename_files.unwrap_or(false);
    cfg.delete_empty_dirs = parsed.delete_empty_dirs.unwrap_or(false);
    cfg.delete_copied_files = parsed.delete_copied_files.unwrap_or(false);
    cfg.ignore_system_reserved = parsed.ignore_excluded_paths.unwrap_or(false);
    cfg.force_overwrite = parsed.force_overwrite.unwrap_or(false);
    cfg.disable_recursion = parsed.disable_recursion.unwrap_or(false);
    cfg.preserve_timestamps = parsed.preserve_timestamps.unwrap_or(true);
    cfg
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    debug!(path = %path.display(), "Loaded XML config");
    Ok(xml_to_config(parsed))
}

/// Load the config in use (env override or OS default).
/// Ok(None) when no config file exists; parse errors are fatal.
pub fn load_config_from_xml() -> Result<Option<Config>> {
    let Some(path) = default_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        debug!(path = %path.display(), "No XML config present");
        return Ok(None);
    }
    load_config_from_xml_path(&path).map(Some)
}

/// Write a commented template config. Refuses to overwrite or to follow symlinked ancestors.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }
    if path.exists() {
        bail!("Config already exists: {}", path.display());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory '{}'", parent.display()))?;
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "/path/to/copyutil.log".into());

    let content = format!(
        "<!--\n  copyutil configuration (XML). CLI flags override these values.\n\n    source_path                -> root directory to copy/move from\n    destination_path           -> root directory to copy/move to\n    paths_list_file            -> file with relative paths to handle, one per line (empty = whole tree)\n    exclude_source_paths_file  -> file with source-relative path prefixes to skip\n    rename_files               -> try a rename first, fall back to copy\n    delete_empty_dirs          -> remove source directories left empty\n    delete_copied_files        -> remove source files after a successful copy\n    ignore_excluded_paths      -> do not skip system-reserved paths (Windows, Program Files, ...)\n    force_overwrite            -> overwrite existing destination files without asking\n    disable_recursion          -> only handle files directly inside requested directories\n    preserve_timestamps        -> keep the source modification time on copies\n    log_level                  -> quiet | normal | info | debug\n    log_file                   -> path to log file (optional)\n-->\n<config>\n  <source_path></source_path>\n  <destination_path></destination_path>\n  <paths_list_file></paths_list_file>\n  <exclude_source_paths_file></exclude_source_paths_file>\n  <rename_files>false</rename_files>\n  <delete_empty_dirs>false</delete_empty_dirs>\n  <delete_copied_files>false</delete_copied_files>\n  <ignore_excluded_paths>false</ignore_excluded_paths>\n  <force_overwrite>false</force_overwrite>\n  <disable_recursion>false</disable_recursion>\n  <preserve_timestamps>true</preserve_timestamps>\n  <log_level>normal</log_level>\n  <log_file>{}</log_file>\n</config>\n",
        suggested_log
    );

    fs::write(path, content).with_context(|| format!("write config '{}'", path.display()))?;
    info!("Created template config at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn template_round_trips_to_defaults() {
        let td = tempdir().unwrap();
        let base = dunce::canonicalize(td.path()).unwrap();
        let path = base.join("cfg").join("config.xml");
        create_template_config(&path).unwrap();
        let cfg = load_config_from_xml_path(&path).unwrap();
        assert!(cfg.source_root.is_none());
        assert!(cfg.paths_list_file.is_none());
        assert!(!cfg.rename_files);
        assert!(cfg.preserve_timestamps);
        assert_eq!(cfg.log_level, LogLevel::Normal);
    }

    #[test]
    fn template_refuses_to_overwrite() {
        let td = tempdir().unwrap();
        let path = td.path().join("config.xml");
        fs::write(&path, "<config/>").unwrap();
        assert!(create_template_config(&path).is_err());
    }
}
