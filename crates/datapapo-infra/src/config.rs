//! Global configuration loader for Datapapo.
//!
//! Reads `config.toml` from the data directory (`~/.datapapo/` in
//! production) and deserializes it into [`GlobalConfig`]. Falls back to
//! sensible defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use datapapo_types::config::GlobalConfig;

/// Resolve the data directory, honoring the `DATAPAPO_DATA_DIR` override.
///
/// Default: `~/.datapapo`. Falls back to the current directory when no
/// home directory can be determined.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("DATAPAPO_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(".datapapo"))
        .unwrap_or_else(|| PathBuf::from(".datapapo"))
}

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config.toml found at {}, using defaults",
                config_path.display()
            );
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datapapo_types::llm::ProviderType;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_global_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.provider, ProviderType::Gemini);
        assert_eq!(config.model, "gemini-2.5-flash");
    }

    #[tokio::test]
    async fn load_global_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(
            &config_path,
            r#"
model = "gemini-2.5-pro"
temperature = 0.2

[http]
port = 4000
"#,
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.model, "gemini-2.5-pro");
        assert!((config.temperature - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.http.port, 4000);
        // Unspecified fields keep defaults
        assert_eq!(config.api_key_secret, "GEMINI_API_KEY");
    }

    #[tokio::test]
    async fn load_global_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.model, "gemini-2.5-flash");
    }

    #[test]
    fn resolve_data_dir_honors_override() {
        // SAFETY: uniquely named var, removed after the assertion.
        unsafe { std::env::set_var("DATAPAPO_DATA_DIR", "/tmp/datapapo-test") };
        let dir = resolve_data_dir();
        unsafe { std::env::remove_var("DATAPAPO_DATA_DIR") };
        assert_eq!(dir, PathBuf::from("/tmp/datapapo-test"));
    }
}
