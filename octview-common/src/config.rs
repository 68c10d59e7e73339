//! Configuration loading and data root resolution

use crate::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default TCP port for the review web UI
pub const DEFAULT_PORT: u16 = 5730;

/// File name of the review database inside the data root
pub const DATABASE_FILE: &str = "reviews.db";

/// Directory (under the data root) holding per-diagnosis image folders
pub const IMAGES_DIR: &str = "downloaded_images";

/// Sampled dataset JSON (diagnosis records) inside the data root
pub const DIAGNOSIS_FILE: &str = "sampled_by_diagnosis.json";

/// Extracted clinical features JSON inside the data root
pub const FEATURES_FILE: &str = "extracted_features.json";

/// Data root resolution following a 4-tier priority order:
/// 1. Command-line argument (highest priority)
/// 2. `OCTVIEW_DATA_ROOT` environment variable
/// 3. `data_root` key in the TOML config file
/// 4. OS-dependent compiled default (fallback)
pub struct DataRootResolver {
    cli_arg: Option<PathBuf>,
}

impl DataRootResolver {
    pub fn new(cli_arg: Option<PathBuf>) -> Self {
        Self { cli_arg }
    }

    /// Resolve the data root, logging which tier supplied it
    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            info!("Data root from command line: {}", path.display());
            return path.clone();
        }

        if let Ok(path) = std::env::var("OCTVIEW_DATA_ROOT") {
            info!("Data root from OCTVIEW_DATA_ROOT: {}", path);
            return PathBuf::from(path);
        }

        if let Some(path) = data_root_from_config_file() {
            info!("Data root from config file: {}", path.display());
            return path;
        }

        let path = default_data_root();
        info!("Data root from platform default: {}", path.display());
        path
    }
}

/// Data root with derived paths for everything the web app reads
#[derive(Debug, Clone)]
pub struct DataRoot {
    root: PathBuf,
}

impl DataRoot {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create the root directory if it does not exist yet
    pub fn ensure_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn database_path(&self) -> PathBuf {
        self.root.join(DATABASE_FILE)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }

    pub fn diagnosis_file(&self) -> PathBuf {
        self.root.join(DIAGNOSIS_FILE)
    }

    pub fn features_file(&self) -> PathBuf {
        self.root.join(FEATURES_FILE)
    }
}

/// Read `data_root` from the platform config file, if present
fn data_root_from_config_file() -> Option<PathBuf> {
    let config_path = dirs::config_dir()?.join("octview").join("config.toml");
    let toml_content = std::fs::read_to_string(&config_path).ok()?;
    let config = toml::from_str::<toml::Value>(&toml_content).ok()?;
    config
        .get("data_root")
        .and_then(|v| v.as_str())
        .map(PathBuf::from)
}

/// Get OS-dependent default data root path
fn default_data_root() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/octview (or /var/lib/octview for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("octview"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/octview"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("octview"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/octview"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("octview"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\octview"))
    } else {
        PathBuf::from("./octview_data")
    }
}
