use bigdecimal::ParseBigDecimalError as BIG_DECIMAL_ERROR;
use reqwest::Error as REQWEST_ERROR;
use serde_json::Error as JSON_ERROR;
use std::num::ParseIntError;
use std::{env::VarError, io::Error as IO_ERROR};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::subscriber::SetGlobalDefaultError as TRACING_GLOBAL_DEFAULT_ERROR;
use url::ParseError as URL_ERROR;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IO_ERROR),

    #[error("{0}")]
    URL(#[from] URL_ERROR),

    #[error("{0}")]
    INT(#[from] ParseIntError),

    #[error("{0}")]
    VAR(#[from] VarError),

    #[error("{0}")]
    TokioJoinError(#[from] JoinError),

    #[error("{0}")]
    BigDecimalError(#[from] BIG_DECIMAL_ERROR),

    #[error("{0}")]
    ReqwestError(#[from] REQWEST_ERROR),

    #[error("{0}")]
    JsonError(#[from] JSON_ERROR),

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] TRACING_GLOBAL_DEFAULT_ERROR),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Field not exists: {0}")]
    FieldNotExist(String),

    #[error("Failed to get block for timestamp {0}")]
    BlockNotFound(i64),

    #[error("No {0} subgraph configured for chain {1}")]
    MissingEndpoint(&'static str, u64),

    #[error("Chain not supported: {0}")]
    UnsupportedChain(u64),

    #[error("Subgraph error: {0}")]
    Subgraph(String),

    #[error("Task message error: {0}")]
    TaskError(String),
}
