use thiserror::Error;

use crate::config::ConfigError;
use crate::event::CatalogError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Runtime error: {0}")]
    Runtime(String),
}

pub type DispatchResult<T> = Result<T, Error>;
