//! Custom tools: manifests, capability checks and the subprocess adapter

mod external;
mod manifest;

pub use external::ExternalTool;
pub use manifest::ToolManifest;
