//! Fleet model for the server manager.
//!
//! A fleet is a set of named server-type templates plus an ordered list of
//! per-instance entries. Resolving an instance name merges its template and
//! entry, expands `$(field)` placeholders and yields an immutable [`Spec`],
//! which [`CommandLine`] turns into the argument vector used to launch it.

pub mod command_line;
pub mod error;
pub mod fields;
pub mod fleet;
pub mod spec;

#[cfg(test)]
mod tests;

pub use command_line::{CommandLine, SWITCH_USER_PROGRAM};
pub use error::{CoreError, Result};
pub use fields::Fields;
pub use fleet::{Fleet, ServerEntry, ServerTemplate};
pub use spec::Spec;

/// Field holding the instance name (entries only).
pub const FIELD_NAME: &str = "name";
/// Field holding the executable to launch.
pub const FIELD_PATH: &str = "path";
/// Field holding the optional run-as user.
pub const FIELD_USER: &str = "user";
/// Field holding the working directory.
pub const FIELD_CWD: &str = "cwd";

/// Fields whose key starts with this prefix are passed on the command line.
pub const OPTION_PREFIX: &str = "--";

const PLACEHOLDER_OPEN: &str = "$(";
const PLACEHOLDER_CLOSE: char = ')';
