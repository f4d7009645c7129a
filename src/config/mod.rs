//! Icon-set configuration: data model and loading strategies.

mod loader;
mod types;

pub use loader::{load_with_warnings, ConfigSource, ConfigWarning, JsonConfigSource};
pub use types::{FormatList, IconConfig, InvocationParams};
