use crate::error::ToolError;
use crate::tool::Tool;
use std::collections::HashMap;
use std::sync::Arc;

/// Closed name → operation mapping. Built once at startup, read-only at
/// dispatch time, so it is safely shared across concurrent dispatches
/// without locking.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Result<(), ToolError> {
        let name = tool.name().to_string();

        if self.tools.contains_key(&name) {
            return Err(ToolError::DuplicateTool { tool: name });
        }

        self.tools.insert(name, Arc::new(tool));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn list_tools(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }
}
