#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod asset;
mod builtin;
pub mod json;

pub use asset::{AcceptAllAssets, LocalAssets};
pub use builtin::BuiltinCatalog;
pub use json::JsonCatalog;
