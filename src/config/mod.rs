// Re-export all items from the submodules
mod module_flags;
mod parser_config;
mod patterns;
mod tool_paths;

pub use module_flags::ModuleFlags;

pub use parser_config::{load_or_default, ParserConfig};

pub use patterns::TargetPatterns;

pub use tool_paths::{Platform, ToolConfig};
