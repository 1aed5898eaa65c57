pub mod error;

pub use error::{EstuaryError, Result};
