//! Driver configuration loaded from `config.toml`.
//!
//! Every key is optional. Problems with the file are reported as warnings and
//! the defaults are used instead.

use directories::ProjectDirs;
use gridcalc_core::sheet::DEFAULT_DELIMITER;
use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

/// What a bare `print` command shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Values,
    Texts,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub output_mode: OutputMode,
    pub delimiter: String,
    pub log_level: LevelFilter,
    pub stop_on_error: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            output_mode: OutputMode::Values,
            delimiter: DEFAULT_DELIMITER.to_string(),
            log_level: LevelFilter::Warn,
            stop_on_error: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    output: Option<OutputSection>,
    log: Option<LogSection>,
    run: Option<RunSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputSection {
    mode: Option<OutputMode>,
    delimiter: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LogSection {
    level: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RunSection {
    stop_on_error: Option<bool>,
}

pub(crate) fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "gridcalc")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

/// Load configuration from `config_file`, or from the user config dir when
/// no file is given. Returns the config and any warnings.
pub fn load_config(config_file: Option<&PathBuf>) -> (Config, Vec<String>) {
    let mut warnings = Vec::new();
    let Some(path) = config_file.cloned().or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    match read_config_file(&path) {
        Ok(content) => {
            let (config, parse_warnings) = parse_config(&content, &path.display().to_string());
            warnings.extend(parse_warnings);
            (config, warnings)
        }
        Err(warning) => {
            warnings.push(warning);
            (Config::default(), warnings)
        }
    }
}

fn read_config_file(path: &Path) -> Result<String, String> {
    let meta = std::fs::metadata(path)
        .map_err(|err| format!("Failed to read metadata for {}: {}", path.display(), err))?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(format!(
            "Refusing to read {}: file too large ({} bytes, max {})",
            path.display(),
            meta.len(),
            MAX_CONFIG_FILE_BYTES
        ));
    }
    std::fs::read_to_string(path).map_err(|err| format!("Failed to read {}: {}", path.display(), err))
}

/// Parse config text. `origin` names the source in warnings.
pub fn parse_config(content: &str, origin: &str) -> (Config, Vec<String>) {
    let mut warnings = Vec::new();
    let mut config = Config::default();
    let file = match toml::from_str::<ConfigFile>(content) {
        Ok(file) => file,
        Err(err) => {
            warnings.push(format!("Failed to parse {}: {}", origin, err));
            return (config, warnings);
        }
    };

    if let Some(output) = file.output {
        if let Some(mode) = output.mode {
            config.output_mode = mode;
        }
        if let Some(delimiter) = output.delimiter {
            config.delimiter = delimiter;
        }
    }

    if let Some(level) = file.log.and_then(|log| log.level) {
        match level.parse::<LevelFilter>() {
            Ok(level) => config.log_level = level,
            Err(_) => warnings.push(format!(
                "Unknown log level '{}' in {}; using '{}'",
                level,
                origin,
                config.log_level.as_str().to_lowercase()
            )),
        }
    }

    if let Some(stop) = file.run.and_then(|run| run.stop_on_error) {
        config.stop_on_error = stop;
    }

    (config, warnings)
}
