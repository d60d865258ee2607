//! Database schema, models, and item content encoding

pub mod content;
pub mod init;
pub mod models;

pub use content::{decode_content, encode_content};
pub use init::*;
pub use models::*;
