// Adapters layer: concrete implementations of the domain ports.

pub mod process;
pub mod workspace;

pub use process::ProcessRunner;
pub use workspace::LocalWorkspace;
