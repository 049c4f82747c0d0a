use crate::contract::ArgContract;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// A locally defined operation dispatchable by name.
///
/// Handlers receive the finalized argument set (defaults already resolved
/// against the contract) and return their textual result. Handler errors
/// stay `anyhow`-typed; the executor wraps them into
/// [`crate::ToolError::ExecutionFailed`] so raw internals never reach the
/// caller.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn contract(&self) -> &ArgContract;

    async fn call(&self, args: &Map<String, Value>) -> Result<String>;
}
