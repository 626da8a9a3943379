//! Layered configuration loading.
//!
//! Layers are merged in the order they are added, later ones winning:
//! built-in defaults, a configuration file, then `LIFECYCLE_HOOKS_*`
//! environment variables. [`ConfigLoader::extract`] validates the result, so
//! an inconsistent audit or logging section never reaches an installer.

use super::{ConfigError, DEFAULT_CONFIG_FILES, ENV_PREFIX, Result, models::HooksConfig, validation};
use figment::{
    Figment, Provider,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One layer merged into a [`ConfigLoader`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
    Environment,
    Provider(String),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Defaults => f.write_str("defaults"),
            ConfigSource::File(path) => write!(f, "file {}", path.display()),
            ConfigSource::Environment => write!(f, "env {ENV_PREFIX}*"),
            ConfigSource::Provider(name) => write!(f, "provider {name}"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum FileFormat {
    Toml,
    Yaml,
    Json,
}

impl FileFormat {
    fn detect(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(FileFormat::Toml),
            "yaml" | "yml" => Some(FileFormat::Yaml),
            "json" => Some(FileFormat::Json),
            _ => None,
        }
    }

    fn merge_into(self, figment: Figment, path: &Path) -> Figment {
        match self {
            FileFormat::Toml => figment.merge(Toml::file(path)),
            FileFormat::Yaml => figment.merge(Yaml::file(path)),
            FileFormat::Json => figment.merge(Json::file(path)),
        }
    }
}

/// Figment-backed loader producing a validated [`HooksConfig`].
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    figment: Figment,
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    /// Start from [`HooksConfig::default`]
    pub fn new() -> Self {
        Self {
            figment: Figment::from(Serialized::defaults(HooksConfig::default())),
            sources: vec![ConfigSource::Defaults],
        }
    }

    /// Merge a TOML, YAML or JSON file, chosen by extension.
    ///
    /// A missing file or an unknown extension is an error and leaves the
    /// loader unchanged.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::FileLoadError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        let format = FileFormat::detect(path).ok_or_else(|| {
            ConfigError::FileLoadError(format!("Unsupported file format: {}", path.display()))
        })?;

        self.figment = format.merge_into(std::mem::take(&mut self.figment), path);
        self.sources.push(ConfigSource::File(path.to_path_buf()));
        Ok(self)
    }

    /// Merge the first default file that exists: the working directory's
    /// `lifecycle-hooks.*`, then `config.*` in the platform config directory.
    /// Finding none is not an error.
    pub fn load_default_files(&mut self) -> Result<&mut Self> {
        match default_candidates().into_iter().find(|path| path.is_file()) {
            Some(path) => self.load_file(path),
            None => Ok(self),
        }
    }

    /// Merge `LIFECYCLE_HOOKS_*` variables; `__` separates nested keys, e.g.
    /// `LIFECYCLE_HOOKS_AUDIT__STAMP_ACTOR=false`.
    pub fn load_env(&mut self) -> &mut Self {
        self.figment = std::mem::take(&mut self.figment).merge(Env::prefixed(ENV_PREFIX).split("__"));
        self.sources.push(ConfigSource::Environment);
        self
    }

    /// Merge any other figment provider
    pub fn merge<T: Provider>(&mut self, provider: T) -> &mut Self {
        let name = provider.metadata().name.to_string();
        self.figment = std::mem::take(&mut self.figment).merge(provider);
        self.sources.push(ConfigSource::Provider(name));
        self
    }

    /// Layers merged so far, in merge order
    pub fn sources(&self) -> &[ConfigSource] {
        &self.sources
    }

    /// Extract and validate the configuration
    pub fn extract(&self) -> Result<HooksConfig> {
        let config: HooksConfig = self
            .figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        validation::validate_config(&config)?;

        debug!(
            sources = %self.sources.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
            soft_delete = config.soft_delete.enabled,
            audit = config.audit.enabled,
            stamp_actor = config.audit.stamp_actor,
            require_actor = config.audit.require_actor,
            "Hook configuration resolved"
        );
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn default_candidates() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = DEFAULT_CONFIG_FILES.iter().map(|file| PathBuf::from(*file)).collect();
    if let Some(dirs) = directories::ProjectDirs::from("org", "lifecycle-hooks", "lifecycle-hooks") {
        candidates.extend(
            ["toml", "yaml", "yml", "json"]
                .iter()
                .map(|ext| dirs.config_dir().join(format!("config.{ext}"))),
        );
    }
    candidates
}
