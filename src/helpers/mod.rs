//! Helper functions for templates and command output

mod date;
mod url;

pub use date::*;
pub use url::*;
