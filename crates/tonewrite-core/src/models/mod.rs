//! Data models for the conversion pipeline

mod response;
mod upload;

pub use response::*;
pub use upload::*;
