use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoClusterError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("引数が不正です: {0}")]
    InvalidArgument(String),

    #[error("同じ位置に既に通報が登録されています (最寄り: ID {id}, {distance_m:.1}m)")]
    DuplicateLocation { id: u64, distance_m: f64 },

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] geo_cluster_common::Error),
}

pub type Result<T> = std::result::Result<T, GeoClusterError>;
