use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Location and tuning of the pretrained nnU-Net model. GCS credentials are
/// not configured here; the storage SDK reads them from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,
    #[serde(default = "default_dataset")]
    pub dataset: String,
    #[serde(default = "default_configuration")]
    pub configuration: String,
    #[serde(default = "default_folds")]
    pub folds: Vec<u32>,
    #[serde(default = "default_tile_step_size")]
    pub tile_step_size: f64,
    #[serde(default)]
    pub disable_tta: bool,
    #[serde(default)]
    pub device: DevicePreference,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevicePreference {
    #[default]
    Auto,
    Cuda,
    Cpu,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            model_dir: default_model_dir(),
            dataset: default_dataset(),
            configuration: default_configuration(),
            folds: default_folds(),
            tile_step_size: default_tile_step_size(),
            disable_tta: false,
            device: DevicePreference::Auto,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_command() -> String {
    "nnUNetv2_predict".to_string()
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("/app/dataset/nnUNet_trained_models")
}

fn default_dataset() -> String {
    "Dataset001_LUMIERE".to_string()
}

fn default_configuration() -> String {
    "3d_fullres".to_string()
}

fn default_folds() -> Vec<u32> {
    vec![0]
}

fn default_tile_step_size() -> f64 {
    0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_mapping_yields_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.logs.level, "info");
        assert_eq!(config.engine.command, "nnUNetv2_predict");
        assert_eq!(config.engine.dataset, "Dataset001_LUMIERE");
        assert_eq!(config.engine.configuration, "3d_fullres");
        assert_eq!(config.engine.folds, vec![0]);
        assert_eq!(config.engine.tile_step_size, 0.5);
        assert!(!config.engine.disable_tta);
        assert_eq!(config.engine.device, DevicePreference::Auto);
    }

    #[test]
    fn partial_overrides_keep_remaining_defaults() {
        let yaml = r#"
server:
  port: 9000
engine:
  device: cpu
  folds: [0, 1, 2]
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.engine.device, DevicePreference::Cpu);
        assert_eq!(config.engine.folds, vec![0, 1, 2]);
        assert_eq!(config.engine.configuration, "3d_fullres");
    }
}
