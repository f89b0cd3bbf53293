use anyhow::Result;
use tracing::{error, info};

use crate::config::ClientConfig;

/// Environment variable consulted when `--api-root` is not given.
pub const API_ROOT_ENV: &str = "DEVJOURNEY_API_ROOT";

/// API root used when neither the flag nor the environment provide one.
pub const DEFAULT_API_ROOT: &str = "http://localhost:8080";

/// Builds the client configuration from the command line values, falling back
/// to the environment (a `.env` file is loaded if present) for the API root.
///
/// Precedence for the API root: flag, then `DEVJOURNEY_API_ROOT`, then
/// [`DEFAULT_API_ROOT`].
pub fn load_config(api_key: &str, api_root_flag: Option<&str>) -> Result<ClientConfig> {
    dotenvy::dotenv().ok();

    let api_key = api_key.trim();
    if api_key.is_empty() {
        error!("API key is empty");
        anyhow::bail!("--api-key must not be empty");
    }

    let api_root = match api_root_flag {
        Some(root) => {
            info!(api_root = %root, "Using API root from --api-root");
            root.to_string()
        }
        None => match std::env::var(API_ROOT_ENV) {
            Ok(root) => {
                info!(api_root = %root, "{API_ROOT_ENV} found in env");
                root
            }
            Err(_) => {
                info!(api_root = DEFAULT_API_ROOT, "No API root configured, using default");
                DEFAULT_API_ROOT.to_string()
            }
        },
    };

    let api_root = api_root.trim().trim_end_matches('/').to_string();
    if !(api_root.starts_with("http://") || api_root.starts_with("https://")) {
        error!(api_root = %api_root, "API root must be an http(s) URL");
        anyhow::bail!("API root must start with http:// or https://, got {api_root:?}");
    }

    let config = ClientConfig {
        api_root,
        api_key: api_key.to_string(),
    };
    config.trace_loaded();
    Ok(config)
}
