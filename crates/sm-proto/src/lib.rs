//! Line-based control protocol spoken between the operator CLI and the
//! supervisor daemon.
//!
//! Every exchange is one request line and one reply line:
//!
//! ```text
//! START compilox1\n   ->   OK\n
//! STOP nope\n         ->   ERROR 'no instance named nope'\n
//! ```

pub mod control;
pub mod error;
pub mod message;


pub use control::{ControlCommand, ControlReply};
pub use error::{ProtoError, Result};
pub use message::Message;

pub const RELOAD: &str = "RELOAD";
pub const START: &str = "START";
pub const STOP: &str = "STOP";
pub const OK: &str = "OK";
pub const ERROR: &str = "ERROR";
