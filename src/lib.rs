// PatternForge - Procedural MIDI Pattern Generator
// Module declarations

pub mod catalog;
pub mod commands;
pub mod generator;
pub mod genre;
pub mod midi;
pub mod state;
pub mod theory;

pub use catalog::{GeneratorHistory, PatternCatalog};
pub use commands::{CommandError, CommandResult};
pub use genre::Genre;
pub use state::Workspace;
pub use theory::{Key, Scale};
