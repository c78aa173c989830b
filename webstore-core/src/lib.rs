pub mod error;
pub mod facade;
pub mod storage;
pub mod value;

pub use error::*;
pub use facade::*;
pub use storage::*;
pub use value::{Encoded, Fetched};
