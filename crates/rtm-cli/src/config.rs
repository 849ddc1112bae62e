//! Converter configuration: built-in defaults, an optional TOML file and
//! command-line overrides, applied in that order.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rtm_transform::DateBasis;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "rtm2todoist.toml";

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_TEMPLATE: &str = "./data/Todoist_Template_CSV_2025.csv";
pub const DEFAULT_OUTPUT: &str = "./data/output.csv";
pub const DEFAULT_OUTPUT_JSON: &str = "./data/used_records.json";
pub const DEFAULT_SCHEMA_OUTPUT: &str = "./data/schema.json";

/// Contents of the TOML config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub input: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub mapping: Option<PathBuf>,
    pub rows_path: Option<String>,
    pub rows_filter: Option<String>,
    pub output: Option<PathBuf>,
    pub output_json: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub date_basis: Option<String>,
}

impl FileConfig {
    /// Parse config file contents.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid config file")
    }

    /// Load `explicit`, or [`DEFAULT_CONFIG_FILE`] if it exists.
    ///
    /// A missing default file yields an empty config; a missing explicit
    /// file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.is_file() {
                    bail!("config file not found: {}", path.display());
                }
                path.to_path_buf()
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.is_file() {
                    debug!("no {DEFAULT_CONFIG_FILE} in working directory, using defaults");
                    return Ok(Self::default());
                }
                path
            }
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let config =
            Self::from_toml(&text).with_context(|| format!("parse {}", path.display()))?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

/// Values given on the command line. `None` defers to the config file.
#[derive(Debug, Clone, Default)]
pub struct ConvertOverrides {
    pub input: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub mapping: Option<PathBuf>,
    pub rows_path: Option<String>,
    pub rows_filter: Option<String>,
    pub output: Option<PathBuf>,
    pub output_json: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub date_basis: Option<String>,
    pub dry_run: bool,
}

/// Fully resolved settings for one conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertSettings {
    /// `None` means discover the newest export in `data_dir`.
    pub input: Option<PathBuf>,
    pub template: PathBuf,
    /// `None` maps every header to itself.
    pub mapping: Option<PathBuf>,
    pub rows_path: Option<String>,
    pub rows_filter: Option<String>,
    pub output: PathBuf,
    pub output_json: PathBuf,
    /// Output paths were set explicitly and must not get a list suffix.
    pub output_explicit: bool,
    pub output_json_explicit: bool,
    pub data_dir: PathBuf,
    pub date_basis: DateBasis,
    pub dry_run: bool,
}

impl ConvertSettings {
    pub fn resolve(file: FileConfig, overrides: ConvertOverrides) -> Result<Self> {
        let output = overrides.output.or(file.output);
        let output_json = overrides.output_json.or(file.output_json);
        let date_basis = match overrides.date_basis.or(file.date_basis) {
            Some(text) => text
                .parse::<DateBasis>()
                .map_err(anyhow::Error::msg)
                .context("invalid date_basis")?,
            None => DateBasis::default(),
        };
        let non_blank = |value: Option<String>| value.filter(|text| !text.trim().is_empty());

        Ok(Self {
            input: overrides.input.or(file.input),
            template: overrides
                .template
                .or(file.template)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE)),
            mapping: overrides.mapping.or(file.mapping),
            rows_path: non_blank(overrides.rows_path.or(file.rows_path)),
            rows_filter: non_blank(overrides.rows_filter.or(file.rows_filter)),
            output_explicit: output.is_some(),
            output_json_explicit: output_json.is_some(),
            output: output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            output_json: output_json.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_JSON)),
            data_dir: overrides
                .data_dir
                .or(file.data_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            date_basis,
            dry_run: overrides.dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults_without_file_or_flags() {
        let settings =
            ConvertSettings::resolve(FileConfig::default(), ConvertOverrides::default()).unwrap();
        assert_eq!(settings.input, None);
        assert_eq!(settings.template, PathBuf::from(DEFAULT_TEMPLATE));
        assert_eq!(settings.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(settings.output_json, PathBuf::from(DEFAULT_OUTPUT_JSON));
        assert!(!settings.output_explicit);
        assert_eq!(settings.date_basis, DateBasis::Local);
    }

    #[test]
    fn test_flags_override_file() {
        let file = FileConfig::from_toml(
            r#"
            output = "out/file.csv"
            rows_path = "tasks"
            date_basis = "utc"
            "#,
        )
        .unwrap();
        let overrides = ConvertOverrides {
            output: Some(PathBuf::from("cli.csv")),
            ..ConvertOverrides::default()
        };
        let settings = ConvertSettings::resolve(file, overrides).unwrap();
        assert_eq!(settings.output, PathBuf::from("cli.csv"));
        assert!(settings.output_explicit);
        assert!(!settings.output_json_explicit);
        assert_eq!(settings.rows_path.as_deref(), Some("tasks"));
        assert_eq!(settings.date_basis, DateBasis::Utc);
    }

    #[test]
    fn test_blank_rows_path_is_absent() {
        let overrides = ConvertOverrides {
            rows_path: Some("  ".to_string()),
            ..ConvertOverrides::default()
        };
        let settings = ConvertSettings::resolve(FileConfig::default(), overrides).unwrap();
        assert_eq!(settings.rows_path, None);
    }

    #[test]
    fn test_invalid_date_basis() {
        let overrides = ConvertOverrides {
            date_basis: Some("mars".to_string()),
            ..ConvertOverrides::default()
        };
        assert!(ConvertSettings::resolve(FileConfig::default(), overrides).is_err());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(FileConfig::from_toml("colour = \"red\"").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "template = \"t.csv\"").unwrap();
        let config = FileConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.template, Some(PathBuf::from("t.csv")));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(FileConfig::load(Some(missing.as_path())).is_err());
    }
}
