pub mod error;
pub mod model;
pub mod utils;

pub use error::{MediaError, TransferError};
pub use model::*;
