use thiserror::Error;

use adify::config::ConfigError;
use adify::export::ExportError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Input(String),

    #[error("{0}")]
    Generation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_) => 2,
            _ => 1,
        }
    }
}
