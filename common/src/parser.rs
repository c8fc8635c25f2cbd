//! 通報一覧レスポンスのパーサー
//!
//! バックエンドのレスポンスは2形式:
//! 1. 生の `[...]` 配列
//! 2. `{ "success": bool, "data": [...], "message": "..." }` エンベロープ
//!
//! 座標はここで検証し、不正なレコードがあれば一覧全体をエラーにする。

use crate::error::{Error, Result};
use crate::types::Report;
use serde_json::Value;
use tracing::warn;

/// 通報一覧をパース
///
/// # Arguments
/// * `json` - レスポンス本文
///
/// # Returns
/// * `Ok(Vec<Report>)` - 座標検証済みの通報
/// * `Err` - JSON不正、`success: false`、座標不正
///
/// # Examples
/// ```
/// use geo_cluster_common::parse_report_feed;
///
/// let json = r#"{"success": true, "data": [
///     {"id": 1, "latitude": "37.0", "longitude": "127.0", "address": "A-dong 1", "type": "online"}
/// ]}"#;
/// let reports = parse_report_feed(json).unwrap();
/// assert_eq!(reports.len(), 1);
/// ```
pub fn parse_report_feed(json: &str) -> Result<Vec<Report>> {
    let value: Value = serde_json::from_str(json.trim())?;
    let reports = reports_from_value(value)?;

    for report in &reports {
        report.point()?;
    }

    Ok(reports)
}

fn reports_from_value(value: Value) -> Result<Vec<Report>> {
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(mut map) => {
            let success = map.get("success").and_then(Value::as_bool).unwrap_or(true);
            if !success {
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("success=false")
                    .to_string();
                warn!(%message, "report feed rejected");
                return Err(Error::Feed(message));
            }

            match map.remove("data") {
                Some(data @ Value::Array(_)) => Ok(serde_json::from_value(data)?),
                Some(Value::Null) | None => {
                    warn!("report feed has no data");
                    Ok(Vec::new())
                }
                Some(other) => Err(Error::Feed(format!(
                    "data must be an array, got {}",
                    type_name(&other)
                ))),
            }
        }
        other => Err(Error::Feed(format!(
            "expected an array or an object, got {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
