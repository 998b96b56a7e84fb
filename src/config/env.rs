//! Environment file loading.

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result, TpsError};

/// Name of the environment file looked up in the working directory.
pub const ENV_FILE_NAME: &str = ".env";

/// Loads `.env` from `dir` if present.
///
/// Variables already set in the process environment win over the file.
/// Returns the path that was loaded, or `None` when there is no file.
/// Nothing is logged here; callers report the outcome.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_dotenv(dir: &Path) -> Result<Option<PathBuf>> {
    let env_path = dir.join(ENV_FILE_NAME);

    if !env_path.exists() {
        return Ok(None);
    }

    dotenvy::from_path(&env_path).map_err(|e| {
        TpsError::Config(ConfigError::EnvFile {
            path: env_path.clone(),
            message: e.to_string(),
        })
    })?;

    Ok(Some(env_path))
}
