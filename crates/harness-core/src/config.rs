use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub consensus: ConsensusConfig,
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl GeneratorConfig {
    pub fn with_env_overrides(&self) -> Self {
        let base_url = env::var("GENERATOR_BASE_URL").unwrap_or_else(|_| self.base_url.clone());
        let model = env::var("GENERATOR_MODEL").unwrap_or_else(|_| self.model.clone());
        Self {
            base_url,
            model,
            ..self.clone()
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.1:8b".to_string(),
            temperature: 1.0,
            timeout_secs: 60,
            max_retries: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusConfig {
    pub trials: usize,
    pub trial_timeout_secs: u64,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            trials: 5,
            trial_timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Relative tool paths resolve against this directory.
    pub base_dir: String,
    /// File analyzed when a tool call omits its `path` argument.
    pub default_file: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            base_dir: ".".to_string(),
            default_file: "./crates/runner/src/main.rs".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn load_from_env() -> anyhow::Result<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| Self::default_config_path());
        Self::load(Path::new(&config_path))
    }

    pub fn default_config_path() -> String {
        "./config.toml".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Tests that touch process-global env vars take this lock so they cannot
    // race each other under the parallel test runner.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const SAMPLE_TOML: &str = r#"
[generator]
base_url = "http://localhost:11434"
model = "llama3.1:8b"
temperature = 1.0
timeout_secs = 60
max_retries = 2

[consensus]
trials = 5
trial_timeout_secs = 90

[tools]
base_dir = "./src"
default_file = "./src/main.rs"
"#;

    #[test]
    fn should_deserialize_config_from_toml() {
        let config: Config = toml::from_str(SAMPLE_TOML).unwrap();

        assert_eq!(config.generator.base_url, "http://localhost:11434");
        assert_eq!(config.generator.model, "llama3.1:8b");
        assert_eq!(config.generator.max_retries, 2);
        assert_eq!(config.consensus.trials, 5);
        assert_eq!(config.consensus.trial_timeout_secs, 90);
        assert_eq!(config.tools.base_dir, "./src");
        assert_eq!(config.tools.default_file, "./src/main.rs");
    }

    #[test]
    fn should_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(SAMPLE_TOML.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.generator.model, "llama3.1:8b");
        assert_eq!(config.consensus.trials, 5);
    }

    #[test]
    fn should_load_config_with_default_path() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(SAMPLE_TOML.as_bytes()).unwrap();
        let temp_path = temp_file.path().to_string_lossy().to_string();

        env::set_var("CONFIG_PATH", &temp_path);

        let config = Config::load_from_env().unwrap();
        assert_eq!(config.generator.base_url, "http://localhost:11434");

        env::remove_var("CONFIG_PATH");
    }

    #[test]
    fn should_use_default_config_path_when_env_not_set() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        env::remove_var("CONFIG_PATH");
        assert_eq!(Config::default_config_path(), "./config.toml");
    }

    #[test]
    fn should_return_error_for_missing_file() {
        let result = Config::load(Path::new("/non/existent/path.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn should_return_error_for_invalid_toml() {
        let invalid_toml = "invalid toml content [[[";
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(invalid_toml.as_bytes()).unwrap();

        let result = Config::load(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn should_apply_generator_env_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let config: Config = toml::from_str(SAMPLE_TOML).unwrap();

        env::set_var("GENERATOR_MODEL", "qwen2.5:14b");
        let overridden = config.generator.with_env_overrides();
        env::remove_var("GENERATOR_MODEL");

        assert_eq!(overridden.model, "qwen2.5:14b");
        assert_eq!(overridden.base_url, config.generator.base_url);
        assert_eq!(overridden.max_retries, config.generator.max_retries);
    }

    #[test]
    fn should_provide_sane_generator_defaults() {
        let defaults = GeneratorConfig::default();
        assert_eq!(defaults.base_url, "http://localhost:11434");
        assert!(defaults.temperature > 0.0);
        assert_eq!(defaults.max_retries, 1);
    }
}
