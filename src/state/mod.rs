// State management module
// Workspace directory handling and guarded output paths

pub mod workspace;

pub use workspace::{Workspace, WorkspaceError, WorkspaceResult};
