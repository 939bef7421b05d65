//! Tool resolution and dispatch for the governance engine
//!
//! [`ToolRegistry`] picks the implementation for each role: the built-in
//! default, or a custom tool named in the project config. Custom tools are
//! described by a JSON [`ToolManifest`] and must pass an explicit capability
//! check before they are handed out. [`Dispatcher`] runs the four
//! operations end to end and wraps each result in a [`Report`].

pub mod dispatcher;
pub mod error;
pub mod plugin;
pub mod registry;

pub use dispatcher::{Dispatcher, Report};
pub use error::{Error, ErrorKind, Result};
pub use plugin::{ExternalTool, ToolManifest};
pub use registry::{Resolution, ToolRegistry};
