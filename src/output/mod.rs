//! Report output
//!
//! - **text**: Human-readable summary on stdout
//! - **json**: Machine-readable report, printed or written to a file

pub mod json;
pub mod text;
