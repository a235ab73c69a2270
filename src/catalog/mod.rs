// Pattern catalog - fingerprint dedup registry and generation history

pub mod fingerprint;
pub mod history;
pub mod registry;

pub use fingerprint::fingerprint;
pub use history::{seed_from_id, GeneratorHistory, HistoryEntry, HistoryError};
pub use registry::{CatalogEntry, CatalogError, PatternCatalog, PatternType};
