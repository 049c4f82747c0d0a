use crate::error::ToolError;
use crate::parser::ToolInvocation;
use crate::registry::ToolRegistry;
use log::info;

/// Validate one parsed invocation against the registry and the tool's
/// argument contract, then run the handler.
///
/// Dispatch sequence: lookup, resolve defaults into a working argument set
/// (the caller's invocation is never mutated, so it stays intact for
/// logging), reject undeclared keys, invoke. Handler failures come back as
/// [`ToolError::ExecutionFailed`] with the cause attached. No retries at
/// this layer; retry policy belongs to the driver that re-samples the
/// generator.
pub async fn execute(
    registry: &ToolRegistry,
    invocation: &ToolInvocation,
) -> Result<String, ToolError> {
    let tool = registry
        .get(&invocation.name)
        .ok_or_else(|| ToolError::UnknownTool {
            name: invocation.name.clone(),
        })?;

    let mut args = invocation.args.clone();

    for (name, spec) in tool.contract().iter() {
        if args.contains_key(name) {
            continue;
        }
        match &spec.default {
            Some(default) => {
                args.insert(name.to_string(), default.resolve());
            }
            None if spec.required => {
                return Err(ToolError::MissingArgument {
                    tool: invocation.name.clone(),
                    argument: name.to_string(),
                });
            }
            None => {}
        }
    }

    // Strict policy: undeclared keys fail the dispatch instead of being
    // silently dropped.
    for key in invocation.args.keys() {
        if !tool.contract().declares(key) {
            return Err(ToolError::UnexpectedArgument {
                tool: invocation.name.clone(),
                argument: key.clone(),
            });
        }
    }

    info!("Dispatching tool '{}'", invocation.name);
    tool.call(&args)
        .await
        .map_err(|source| ToolError::ExecutionFailed {
            tool: invocation.name.clone(),
            source,
        })
}
