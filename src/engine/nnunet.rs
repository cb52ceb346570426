use super::SegmentationEngine;
use crate::config::{DevicePreference, EngineConfig};
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Drives the `nnUNetv2_predict` entry point of the nnU-Net v2 runtime as a
/// child process, one invocation per request.
#[derive(Debug)]
pub struct NnUnetEngine {
    config: EngineConfig,
    device: &'static str,
}

impl NnUnetEngine {
    /// Verifies the trained-model directory and resolves the device
    /// preference. Runs once at startup; failure means the process cannot
    /// serve.
    pub async fn initialize(config: &EngineConfig) -> Result<Self> {
        info!("Initializing nnU-Net predictor...");

        let dataset_dir = config.model_dir.join(&config.dataset);
        if !dataset_dir.is_dir() {
            return Err(Error::config(format!(
                "Model path does not exist: {}",
                dataset_dir.display()
            )));
        }

        let device = resolve_device(config.device);

        info!("Predictor initialized successfully");
        info!("Using device: {}", device);

        Ok(Self {
            config: config.clone(),
            device,
        })
    }

    fn build_command(&self, input_dir: &Path, output_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.config.command);
        cmd.arg("-i")
            .arg(input_dir)
            .arg("-o")
            .arg(output_dir)
            .arg("-d")
            .arg(&self.config.dataset)
            .arg("-c")
            .arg(&self.config.configuration)
            .arg("-step_size")
            .arg(self.config.tile_step_size.to_string())
            .arg("-device")
            .arg(self.device);

        cmd.arg("-f");
        for fold in &self.config.folds {
            cmd.arg(fold.to_string());
        }

        if self.config.disable_tta {
            cmd.arg("--disable_tta");
        }

        // The runtime locates trained weights through this variable.
        cmd.env("nnUNet_results", &self.config.model_dir);

        cmd
    }
}

#[async_trait]
impl SegmentationEngine for NnUnetEngine {
    async fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
        debug!("Running nnU-Net inference on {}", input_dir.display());

        let output = self
            .build_command(input_dir, output_dir)
            .output()
            .await
            .map_err(|e| {
                Error::inference(format!("Failed to spawn {}: {e}", self.config.command))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::inference(format!(
                "{} exited with {}: {}",
                self.config.command,
                output.status,
                stderr.trim()
            )));
        }

        debug!("Inference complete");

        list_output_files(output_dir).await
    }
}

async fn list_output_files(output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(output_dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

fn resolve_device(preference: DevicePreference) -> &'static str {
    match preference {
        DevicePreference::Cuda => "cuda",
        DevicePreference::Cpu => "cpu",
        DevicePreference::Auto => {
            if Path::new("/dev/nvidiactl").exists() {
                "cuda"
            } else {
                "cpu"
            }
        }
    }
}
