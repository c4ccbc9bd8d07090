#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod cache;
mod catalog;
pub mod classification;
mod config;
mod error;
mod matcher;
mod metrics;
mod normalize;
mod preload;
mod service;

pub use cache::*;
pub use catalog::*;
pub use classification::MovementCategory;
pub use config::*;
pub use error::*;
pub use matcher::*;
pub use metrics::*;
pub use normalize::*;
pub use preload::*;
pub use service::*;
