pub mod common;
pub mod file;
pub mod pretty_format;
