use kubeprom_client::errors::ClientError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CadvisorError>;

#[derive(Debug, Error)]
pub enum CadvisorError {
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    #[error("invalid target: {0}")]
    InvalidTarget(String),
}
