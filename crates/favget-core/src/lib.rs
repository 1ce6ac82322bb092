pub mod api;
pub mod config;
pub mod convert;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod logging;
pub mod probe;
pub mod resolver;
pub mod retry;
pub mod url_model;

pub use error::{FavgetError, Result};
