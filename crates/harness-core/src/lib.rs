pub mod config;

pub use config::{Config, ConsensusConfig, GeneratorConfig, ToolsConfig};
