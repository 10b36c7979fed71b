//! Protocol Module
//!
//! Defines the text command protocol consumed by the driver.
//!
//! ## Input Format
//! Whitespace-separated tokens; line breaks carry no meaning.
//! ```text
//! <count>
//! insert <key> <value>
//! delete <key> <value>
//! find <key>
//! ...
//! ```
//!
//! ### Output
//! - `insert` / `delete`: nothing
//! - `find`: one line, the key's values ascending and separated by single
//!   spaces, or `null` when the key holds none

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::Response;
pub use codec::{write_response, CommandReader, Parsed};
