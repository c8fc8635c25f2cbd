//! フィード読み込みテスト
//!
//! ファイルからの通報一覧読み込みと境界での検証

use geo_cluster::error::GeoClusterError;
use geo_cluster::feed::load_reports;
use geo_cluster_common::{ReportStatus, SourceType};
use std::path::Path;
use tempfile::tempdir;

/// エンベロープ形式のファイル
#[tokio::test]
async fn test_load_envelope_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("collections.json");
    std::fs::write(
        &path,
        r#"{"success": true, "data": [
            {"id": 1, "latitude": "37.0", "longitude": "127.0", "address": "A-dong 1", "type": "online", "created_at": "2025-06-01 09:00:00"},
            {"id": 2, "latitude": 37.5, "longitude": 127.5, "address": "B-dong 9", "type": "field", "status": "processed"}
        ]}"#,
    )
    .unwrap();

    let reports = load_reports(&path).await.expect("読み込み失敗");
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].source_type, SourceType::Online);
    assert_eq!(reports[0].created_at, "2025-06-01 09:00:00");
    assert_eq!(reports[1].status, ReportStatus::Processed);
}

/// 生の配列形式のファイル
#[tokio::test]
async fn test_load_array_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("reports.json");
    std::fs::write(&path, r#"[{"id": 5, "latitude": 35.1, "longitude": 129.0, "type": "field"}]"#).unwrap();

    let reports = load_reports(&path).await.expect("読み込み失敗");
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].id, 5);
}

/// 存在しないファイル
#[tokio::test]
async fn test_load_missing_file() {
    let result = load_reports(Path::new("/nonexistent/path/reports.json")).await;
    assert!(matches!(result, Err(GeoClusterError::FileNotFound(_))));
}

/// 座標が不正なレコードを含む
#[tokio::test]
async fn test_load_rejects_invalid_coordinates() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"[{"id": 1, "latitude": 137.0, "longitude": 37.0, "type": "online"}]"#).unwrap();

    let result = load_reports(&path).await;
    assert!(matches!(
        result,
        Err(GeoClusterError::Common(geo_cluster_common::Error::InvalidPoint { .. }))
    ));
}

/// バックエンドがエラーを返した
#[tokio::test]
async fn test_load_failed_response() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("failed.json");
    std::fs::write(&path, r#"{"success": false, "message": "세션이 만료되었습니다"}"#).unwrap();

    let err = load_reports(&path).await.unwrap_err();
    assert!(err.to_string().contains("세션이 만료되었습니다"));
}

/// 壊れたJSON
#[tokio::test]
async fn test_load_corrupted_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ invalid json }").unwrap();

    let result = load_reports(&path).await;
    assert!(matches!(
        result,
        Err(GeoClusterError::Common(geo_cluster_common::Error::Json(_)))
    ));
}

/// ポイ捨て処理履歴（type列なし）と廃棄物収集（unprocessed）の実データ形式
#[tokio::test]
async fn test_load_backend_status_rows() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("mixed.json");
    std::fs::write(
        &path,
        r#"{"success": true, "data": [
            {"id": 1, "latitude": "37.0", "longitude": "127.0", "address": "A-dong 1", "waste_type": "대형폐기물", "status": "processed"},
            {"id": 2, "latitude": "37.1", "longitude": "127.1", "address": "B-dong 9", "type": "online", "status": "unprocessed"}
        ]}"#,
    )
    .unwrap();

    let reports = load_reports(&path).await.expect("読み込み失敗");
    assert_eq!(reports[0].source_type, SourceType::Field);
    assert_eq!(reports[0].status, ReportStatus::Processed);
    assert_eq!(reports[1].status, ReportStatus::Active);

    let history = geo_cluster_common::group_history(&reports);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].dominant_waste_type, "대형폐기물");
}
