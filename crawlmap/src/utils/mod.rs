//! Core utilities: address parsing and normalization, plus input
//! sanitization and terminal prompting for interactive front-ends.

mod sanitize;
mod terminal;
mod url;

pub use sanitize::{DesiredType, Sanitize};
pub use terminal::Terminal;
pub use url::{Address, AddressError, HostKind, Scheme};
