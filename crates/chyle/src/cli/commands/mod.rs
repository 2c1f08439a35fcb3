//! CLI commands

mod create;
mod validate;

pub use create::CreateCommand;
pub use validate::ValidateCommand;
