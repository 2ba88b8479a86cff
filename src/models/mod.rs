// Re-export all model types for ease of use

pub mod credentials;
pub mod entry;
pub mod search;

pub use credentials::*;
pub use entry::*;
pub use search::*;
