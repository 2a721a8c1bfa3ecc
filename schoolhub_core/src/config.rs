use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::info;

use crate::error::CoreError;

static DATA_DIR_NAME: &str = "schoolhub";
static DB_FILE_NAME: &str = "schoolhub.sqlite";
static UPLOAD_DIR_NAME: &str = "schoolImages";
static CONFIG_FILE_NAME: &str = "config.json";

/// Overrides the platform data directory when set.
pub static DATA_DIR_ENV: &str = "SCHOOLHUB_DATA_DIR";

// data_dir_path
// |- schoolhub
//    |- schoolhub.sqlite
//    |- schoolImages/
//    |- config.json

fn default_listen_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_seed_sample_data() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HubConfig {
    pub database_path: PathBuf,

    /// Directory holding uploaded school images, served under `/schoolImages`.
    pub upload_dir: PathBuf,

    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Insert the demo schools when the directory is empty.
    ///
    /// `serde(default)` keeps older config.json files loading.
    #[serde(default = "default_seed_sample_data")]
    pub seed_sample_data: bool,
}

impl HubConfig {
    /// Creates a config with every file placed inside `data_dir`
    pub fn new(data_dir: &Path) -> Self {
        HubConfig {
            database_path: data_dir.join(DB_FILE_NAME),
            upload_dir: data_dir.join(UPLOAD_DIR_NAME),
            listen_addr: default_listen_addr(),
            seed_sample_data: default_seed_sample_data(),
        }
    }

    /// Reads `config.json` from `dir`, writing a fresh default one first if
    /// it doesn't exist yet.
    pub async fn load_from(dir: &Path) -> Result<Self, CoreError> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        fs::create_dir_all(dir).await?;

        if config_path.exists() {
            let mut file = fs::File::open(&config_path).await?;
            let mut contents = String::new();
            file.read_to_string(&mut contents).await?;

            let config: HubConfig = serde_json::from_str(&contents)?;
            Ok(config)
        } else {
            let config = HubConfig::new(dir);

            let json = serde_json::to_string_pretty(&config)?;
            let mut file = fs::File::create(&config_path).await?;
            file.write_all(json.as_bytes()).await?;

            info!("Wrote default config to {}", config_path.display());
            Ok(config)
        }
    }
}

/// Gets the existing config or initializes a new one if it doesn't exist
pub async fn get_or_init() -> Result<HubConfig, CoreError> {
    let dir = match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => dirs::data_dir()
            .ok_or(CoreError::NoDataDir)?
            .join(DATA_DIR_NAME),
    };

    HubConfig::load_from(&dir).await
}
