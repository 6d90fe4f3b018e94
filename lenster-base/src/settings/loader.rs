//! Load a settings object from the config locations.

use std::{collections::HashMap, env, error::Error, path::Path, path::PathBuf};

use config::{Config, Environment, File};
use eyre::{eyre, Context, Result};

use super::{RawSettings, Settings};

const ENV_PREFIX: &str = "LENSTER";

/// Deserialize the settings from the config directory, the files listed in
/// `CONFIG_FILES` and `LENSTER_` environment variables.
pub fn load_settings(config_dir: impl AsRef<Path>) -> Result<Settings> {
    let config_files = env::var("CONFIG_FILES")
        .map(|s| s.split(',').map(|s| s.trim().to_owned()).collect())
        .unwrap_or_default();
    load_settings_from(config_dir.as_ref(), config_files, None)
}

/// Same as [`load_settings`] with explicit sources. When `env_vars` is set it
/// replaces the process environment.
pub(crate) fn load_settings_from(
    config_dir: &Path,
    config_files: Vec<String>,
    env_vars: Option<HashMap<String, String>>,
) -> Result<Settings> {
    let mut loaded_sources = vec![];
    let mut builder = Config::builder();

    // Always load the default config files (`config/*.json`)
    let mut base_files = vec![];
    for entry in config_dir
        .read_dir()
        .with_context(|| format!("Failed to open config directory {config_dir:?}"))?
    {
        let entry = entry.context("Failed to read config directory entry")?;
        let path = entry.path();
        if path.is_file() && path.extension() == Some("json".as_ref()) {
            base_files.push(path);
        }
    }
    // Directory order is unspecified
    base_files.sort();
    for path in base_files {
        loaded_sources.push(format!("{path:?}"));
        builder = builder.add_source(File::from(path));
    }

    // Load a set of additional user specified config files
    for path in config_files.iter().filter(|p| !p.is_empty()) {
        let p = PathBuf::from(path);
        if p.is_file() {
            if p.extension() == Some("json".as_ref()) {
                loaded_sources.push(path.clone());
                builder = builder.add_source(File::from(p));
            } else {
                return Err(eyre!(
                    "Provided config path via CONFIG_FILES is of an unsupported type ({p:?})"
                ));
            }
        } else if !p.exists() {
            return Err(eyre!(
                "Provided config path via CONFIG_FILES does not exist ({p:?})"
            ));
        } else {
            return Err(eyre!(
                "Provided config path via CONFIG_FILES is not a file ({p:?})"
            ));
        }
    }

    let config_deserializer = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env_vars),
        )
        .build()
        .context("Failed to load config sources")?;

    let raw = config_deserializer
        .try_deserialize::<RawSettings>()
        .or_else(|err| {
            let mut err = if let Some(source_err) = err.source() {
                let source = format!("Config error source: {source_err}");
                Err(err).context(source)
            } else {
                Err(err.into())
            };
            for cfg_path in &loaded_sources {
                err = err.with_context(|| format!("Config loaded: {cfg_path}"));
            }
            err.context("Config deserialization error")
        })?;

    Settings::try_from(raw).context("Invalid settings")
}
