use color_eyre::Result;
use directories::ProjectDirs;
use lazy_static::lazy_static;
use serde::Deserialize;
use std::{env, path::PathBuf};
use tracing::info;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    /// Schema file rendered instead of the built-in demo schema.
    #[serde(default)]
    pub schema: Option<PathBuf>,
    pub tick_rate: f64,
    pub frame_rate: f64,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

pub const DEFAULT_TICK_RATE: f64 = 4.0;
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

impl Config {
    /// Defaults, then `config.json5` / `config.toml` from the config dir.
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::load_from(&get_config_dir())
    }

    pub fn load_from(config_dir: &std::path::Path) -> Result<Self, config::ConfigError> {
        let data_dir = get_data_dir();
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?
            .set_default("tick_rate", DEFAULT_TICK_RATE)?
            .set_default("frame_rate", DEFAULT_FRAME_RATE)?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.toml", config::FileFormat::Toml),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            info!(dir = %config_dir.display(), "no configuration file found, using defaults");
        }

        let config: Self = builder.build()?.try_deserialize()?;
        config.check_rates()?;
        Ok(config)
    }

    /// Command line values win over the file.
    pub fn merge_cli(
        mut self,
        schema: Option<PathBuf>,
        tick_rate: Option<f64>,
        frame_rate: Option<f64>,
    ) -> Result<Self, config::ConfigError> {
        if schema.is_some() {
            self.schema = schema;
        }
        if let Some(rate) = tick_rate {
            self.tick_rate = rate;
        }
        if let Some(rate) = frame_rate {
            self.frame_rate = rate;
        }
        self.check_rates()?;
        Ok(self)
    }

    /// Both rates become `1 / rate` second intervals, so they must be finite and positive.
    fn check_rates(&self) -> Result<(), config::ConfigError> {
        for (key, rate) in [("tick_rate", self.tick_rate), ("frame_rate", self.frame_rate)] {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(config::ConfigError::Message(format!(
                    "{key} must be a positive number, got {rate}"
                )));
            }
        }
        Ok(())
    }
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "chicken105", env!("CARGO_PKG_NAME"))
}
