// Spellbook Archive - Core Library
// Exposes the registry, CSV collection I/O and the command layer
// for use by the interactive binary and tests

pub mod archive;
pub mod collection;
pub mod commands;
pub mod entities;
pub mod events;

// Re-export commonly used types
pub use archive::{Archive, ArchiveError, CopyCount};
pub use collection::{
    import_collection, import_spellbook, save_collection,
    CollectionError, ImportSummary,
};
pub use commands::{execute, Command, Flow, Reply};
pub use entities::{
    SerialNumber, Spellbook,
    Student, StudentNumber, FIRST_STUDENT_NUMBER,
};
pub use events::{ArchiveEvent, EntityType, EventType, Journal};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
