pub mod identifier_set;
pub mod loader;

pub use identifier_set::{IdentifierSet, IDENTIFIER_COLUMN};
pub use loader::{load_identifiers, IdentifierLoader};
