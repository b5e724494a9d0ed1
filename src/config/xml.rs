//! XML configuration support.
//! - Loads optional defaults from config.xml (quick_xml + serde).
//! - Unknown fields are rejected to surface misconfigurations early.
//!
//! Example:
//! <config>
//!   <workers>8</workers>
//!   <buffer>50000</buffer>
//!   <stats>true</stats>
//!   <log_level>normal</log_level>
//!   <log_file>/var/log/merge_move.log</log_file>
//! </config>
//!
//! Notes:
//! - Nothing is ever written: a missing default file simply means "use defaults".
//! - An explicitly requested file ($MERGE_MOVE_CONFIG) must exist.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::CONFIG_ENV;
use super::paths::default_config_path;
use super::types::{Config, LogLevel};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(default, deserialize_with = "de_usize_trimmed_opt")]
    workers: Option<usize>,
    #[serde(default, deserialize_with = "de_usize_trimmed_opt")]
    buffer: Option<usize>,
    #[serde(default)]
    stats: Option<bool>,
    #[serde(default)]
    log_level: Option<String>,
    #[serde(default)]
    log_file: Option<String>,
}

// Numbers may be surrounded by whitespace in hand-edited files.
fn de_usize_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<usize>()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid number '{s}': {e}"))),
    }
}

// Map XmlConfig onto an existing Config; absent fields keep their value.
fn apply_xml(parsed: XmlConfig, cfg: &mut Config) -> Result<()> {
    if let Some(w) = parsed.workers {
        cfg.workers = w;
    }
    if let Some(b) = parsed.buffer {
        cfg.buffer = b;
    }
    if let Some(s) = parsed.stats {
        cfg.stats = s;
    }
    if let Some(s) = parsed.log_level.as_deref() {
        cfg.log_level = s
            .trim()
            .parse::<LogLevel>()
            .map_err(anyhow::Error::msg)?;
    }
    if let Some(s) = parsed.log_file.as_deref() {
        let trimmed = s.trim();
        if !trimmed.is_empty() {
            cfg.log_file = Some(PathBuf::from(trimmed));
        }
    }
    Ok(())
}

/// Load a Config from a specific XML file path; fields missing from the file use defaults.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    let mut cfg = Config::default();
    apply_xml(parsed, &mut cfg).with_context(|| format!("invalid value in '{}'", path.display()))?;
    Ok(cfg)
}

/// Load the effective config file, or defaults when no file is present.
///
/// Returns the path that was used (if any) alongside the Config.
pub fn load_config() -> Result<(Config, Option<PathBuf>)> {
    let explicit = env::var_os(CONFIG_ENV).is_some_and(|p| !p.is_empty());
    let Some(path) = default_config_path() else {
        return Ok((Config::default(), None));
    };

    if !path.exists() {
        if explicit {
            bail!("{} points to a missing file: {}", CONFIG_ENV, path.display());
        }
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok((Config::default(), None));
    }

    let cfg = load_config_from_xml_path(&path)?;
    debug!(path = %path.display(), ?cfg, "loaded config file");
    Ok((cfg, Some(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_all_fields_with_whitespace() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.xml");
        fs::write(
            &p,
            "<config>\n  <workers> 6 </workers>\n  <buffer>\n    250\n  </buffer>\n  <stats>true</stats>\n  <log_level> Debug </log_level>\n  <log_file>/tmp/mm.log</log_file>\n</config>\n",
        )
        .unwrap();

        let cfg = load_config_from_xml_path(&p).unwrap();
        assert_eq!(cfg.workers, 6);
        assert_eq!(cfg.buffer, 250);
        assert!(cfg.stats);
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/mm.log")));
    }

    #[test]
    fn empty_config_keeps_defaults() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.xml");
        fs::write(&p, "<config></config>").unwrap();
        assert_eq!(load_config_from_xml_path(&p).unwrap(), Config::default());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.xml");
        fs::write(&p, "<config><download_base>/x</download_base></config>").unwrap();
        let err = load_config_from_xml_path(&p).unwrap_err();
        assert!(format!("{err:#}").contains("unknown field"), "err: {err:#}");
    }

    #[test]
    fn bad_number_is_rejected() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.xml");
        fs::write(&p, "<config><workers>many</workers></config>").unwrap();
        assert!(load_config_from_xml_path(&p).is_err());
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.xml");
        fs::write(&p, "<config><log_level>loud</log_level></config>").unwrap();
        let err = load_config_from_xml_path(&p).unwrap_err();
        assert!(format!("{err:#}").contains("invalid log level"));
    }
}
