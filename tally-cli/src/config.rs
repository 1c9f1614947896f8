use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tally_ingest::{FormatKind, TargetMonth};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Restrict detection to this format when `--fmt` is not given.
    pub default_format: Option<FormatKind>,
    /// Month used when `--month` is not given (falls back to the current month).
    pub default_month: Option<u32>,
    /// tracing filter directive, e.g. "tally_ingest=debug". `RUST_LOG` wins.
    pub log_filter: Option<String>,
}

impl Config {
    pub fn month(&self) -> Result<Option<TargetMonth>> {
        self.default_month
            .map(TargetMonth::new)
            .transpose()
            .context("config default_month")
    }
}

/// `$TALLY_HOME` when set, else `~/.tally`.
fn tally_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("TALLY_HOME").filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var_os("HOME").context("neither TALLY_HOME nor HOME is set")?;
    Ok(PathBuf::from(home).join(".tally"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(tally_home()?.join("config.toml"))
}

/// Load `path`, or `~/.tally/config.toml` when not given. A missing file
/// yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

fn parse_config(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s)?;
    cfg.month()?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: Option<&Path>) -> Result<()> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    if let Some(dir) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let cfg = parse_config(
            r#"
default_format = "boa_checking"
default_month = 8
log_filter = "tally_ingest=debug"
"#,
        )
        .unwrap();
        assert_eq!(cfg.default_format, Some(FormatKind::BoaChecking));
        assert_eq!(cfg.month().unwrap().map(|m| m.number()), Some(8));
        assert_eq!(cfg.log_filter.as_deref(), Some("tally_ingest=debug"));
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(parse_config("default_format = \"wells_fargo\"").is_err());
        assert!(parse_config("default_month = 13").is_err());
    }

    #[test]
    fn test_init_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        init_config(Some(&p)).unwrap();
        assert_eq!(load_config(Some(&p)).unwrap(), Config::default());
    }

    #[test]
    fn test_init_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("nested").join(".tally").join("config.toml");
        init_config(Some(&p)).unwrap();
        assert!(p.exists());
    }

    #[test]
    fn test_config_path_file_name() {
        // Either TALLY_HOME or HOME is set wherever the test suite runs.
        let p = config_path().unwrap();
        assert_eq!(p.file_name().and_then(|n| n.to_str()), Some("config.toml"));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(cfg, Config::default());
    }
}
