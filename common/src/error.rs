//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid point: latitude={latitude}, longitude={longitude}")]
    InvalidPoint { latitude: f64, longitude: f64 },

    #[error("Invalid threshold: {0} (must be a finite, non-negative number of meters)")]
    InvalidThreshold(f64),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
