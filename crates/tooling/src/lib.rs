pub mod contract;
pub mod error;
pub mod executor;
pub mod fn_signatures;
pub mod parser;
pub mod registry;
pub mod tool;

pub use contract::{ArgContract, ArgDefault, ArgSpec};
pub use error::ToolError;
pub use executor::execute;
pub use fn_signatures::FnSignaturesTool;
pub use parser::{parse_tool_call, ToolInvocation};
pub use registry::ToolRegistry;
pub use tool::Tool;
