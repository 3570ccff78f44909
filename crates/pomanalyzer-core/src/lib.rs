pub mod error;
pub mod models;
pub mod selector;
pub mod storage;

pub use error::{Error, Result};
