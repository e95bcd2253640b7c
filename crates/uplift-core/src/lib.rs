pub mod context;
pub mod coordinator;
pub mod error;
pub mod infra;
pub mod io;
pub mod lock;
pub mod paths;
pub mod pipeline;
pub mod settings;
pub mod template;
pub mod version;
pub mod workspace;

pub use coordinator::{migrate, MigrationOutcome};
pub use error::{Result, UpliftError};
