pub mod error;
pub mod transfer;

pub use error::TransferError;
pub use transfer::{PartialTransfer, Transfer};
