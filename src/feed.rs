//! 通報フィードの読み込み
//!
//! ファイルまたは標準入力（`-`）からバックエンドの一覧レスポンスを読み、
//! 座標検証済みの通報リストにする。

use crate::error::{GeoClusterError, Result};
use geo_cluster_common::{parse_report_feed, Report};
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// 標準入力を表すパス
pub const STDIN_PATH: &str = "-";

pub async fn load_reports(path: &Path) -> Result<Vec<Report>> {
    let content = read_feed(path).await?;
    let reports = parse_report_feed(&content)?;
    debug!(path = %path.display(), count = reports.len(), "loaded report feed");
    Ok(reports)
}

async fn read_feed(path: &Path) -> Result<String> {
    if path.as_os_str() == STDIN_PATH {
        let mut content = String::new();
        tokio::io::stdin().read_to_string(&mut content).await?;
        return Ok(content);
    }

    if !path.exists() {
        return Err(GeoClusterError::FileNotFound(path.display().to_string()));
    }

    Ok(tokio::fs::read_to_string(path).await?)
}
