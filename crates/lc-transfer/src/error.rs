use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TransferError {
    #[error("missing transfer field: {0}")]
    MissingField(&'static str),

    #[error("transfer amount must be a finite number, got {0}")]
    NonFiniteAmount(f64),
}
