use crate::contract::ArgContract;
use crate::tool::Tool;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use regex::Regex;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::fs;

// Top-level `fn` items only: anchored at column zero, so indented methods
// inside impl blocks are skipped.
static FN_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^(?:pub(?:\([^)]*\))?\s+)?(?:const\s+)?(?:async\s+)?(?:unsafe\s+)?fn\s+([A-Za-z_][A-Za-z0-9_]*)[^{;]*?(?:->\s*([^{;]+?))?\s*[{;]"#,
    )
    .expect("valid regex")
});

/// Lists `name: return_type` for every top-level function in a Rust source
/// file, sorted by name for stable output.
///
/// The `path` argument is optional: when omitted (or empty) it derives to a
/// configured default file, and relative paths resolve against a configured
/// base directory.
pub struct FnSignaturesTool {
    base_dir: PathBuf,
    default_file: PathBuf,
    max_file_size: u64,
    allowed_extensions: Vec<String>,
    contract: ArgContract,
}

impl FnSignaturesTool {
    pub const NAME: &'static str = "fn_signatures";

    pub fn new(base_dir: PathBuf, default_file: PathBuf) -> Self {
        let default = default_file.to_string_lossy().to_string();
        let contract = ArgContract::new()
            .with_derived_default("path", move || Value::String(default.clone()));

        Self {
            base_dir,
            default_file,
            max_file_size: 1024 * 1024,
            allowed_extensions: vec!["rs".to_string()],
            contract,
        }
    }

    pub fn with_max_file_size(mut self, size_bytes: u64) -> Self {
        self.max_file_size = size_bytes;
        self
    }

    pub fn with_allowed_extensions(mut self, extensions: Vec<String>) -> Self {
        self.allowed_extensions = extensions;
        self
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    fn is_allowed_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.allowed_extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    fn list_signatures(source: &str) -> Vec<(String, String)> {
        let mut signatures: Vec<(String, String)> = FN_SIGNATURE
            .captures_iter(source)
            .map(|captures| {
                let name = captures[1].to_string();
                let return_type = captures
                    .get(2)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_else(|| "()".to_string());
                (name, return_type)
            })
            .collect();
        signatures.sort();
        signatures
    }
}

#[async_trait]
impl Tool for FnSignaturesTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Returns a newline-delimited list of 'name: return_type' for each top-level function in a Rust source file"
    }

    fn contract(&self) -> &ArgContract {
        &self.contract
    }

    async fn call(&self, args: &Map<String, Value>) -> Result<String> {
        let Some(path) = args.get("path").and_then(Value::as_str) else {
            bail!("'path' must be a string");
        };

        // An empty path means "use the default", same as omitting it.
        let path = if path.is_empty() {
            self.default_file.clone()
        } else {
            self.resolve(path)
        };
        if !self.is_allowed_file(&path) {
            bail!("File type not allowed: {}", path.display());
        }

        let metadata = fs::metadata(&path)
            .await
            .with_context(|| format!("File not found: {}", path.display()))?;
        if metadata.len() > self.max_file_size {
            bail!(
                "File too large: {} bytes (limit {})",
                metadata.len(),
                self.max_file_size
            );
        }

        let source = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let lines: Vec<String> = Self::list_signatures(&source)
            .into_iter()
            .map(|(name, return_type)| format!("{name}: {return_type}"))
            .collect();

        Ok(lines.join("\n"))
    }
}
