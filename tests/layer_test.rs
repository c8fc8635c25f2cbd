//! 地図レイヤー出力テスト

use geo_cluster::layer::{build_history_layer, build_marker_layer, marker_title, write_layer, MarkerKind};
use geo_cluster_common::{group_history, GeoClusterEngine, Report, ReportStatus, SourceType};
use tempfile::tempdir;

fn sample_engine() -> GeoClusterEngine {
    let mut engine = GeoClusterEngine::new();
    engine
        .load(&[
            Report::new(1, 37.0, 127.0, "A-dong 1", SourceType::Online),
            Report::new(2, 37.00001, 127.00001, "A-dong 1", SourceType::Online),
            Report::new(3, 37.5, 127.5, "B-dong 9", SourceType::Field),
            Report::new(4, 37.6, 127.6, "", SourceType::Online),
        ])
        .unwrap();
    engine
}

#[test]
fn test_marker_layer_kinds_and_titles() {
    let engine = sample_engine();
    let layer = build_marker_layer(engine.entries());
    assert_eq!(layer.markers.len(), 3);

    let cluster = layer.markers.iter().find(|m| m.kind == MarkerKind::Cluster).unwrap();
    assert_eq!(cluster.title, "A-dong 1 (2건)");
    assert_eq!(cluster.member_ids, vec![1, 2]);
    assert_eq!(cluster.position.latitude, 37.0);

    let field = layer.markers.iter().find(|m| m.kind == MarkerKind::Field).unwrap();
    assert_eq!(field.title, "B-dong 9");

    let online = layer.markers.iter().find(|m| m.kind == MarkerKind::Online).unwrap();
    assert_eq!(online.title, "주소 없음");
    assert_eq!(online.member_ids, vec![4]);
}

#[test]
fn test_marker_title_single() {
    let engine = sample_engine();
    let entry = engine.get(3).unwrap();
    assert_eq!(marker_title(entry), "B-dong 9");
}

#[test]
fn test_history_layer() {
    let reports = vec![
        Report::new(1, 37.0, 127.0, "A-dong 1", SourceType::Online)
            .with_status(ReportStatus::Processed)
            .with_waste_type("대형폐기물"),
        Report::new(2, 37.1, 127.1, "A-dong 1", SourceType::Field).with_status(ReportStatus::Processed),
        Report::new(3, 37.2, 127.2, "A-dong 1", SourceType::Online)
            .with_status(ReportStatus::Processed)
            .with_waste_type("대형폐기물"),
    ];

    let layer = build_history_layer(&group_history(&reports));
    assert_eq!(layer.markers.len(), 1);

    let marker = &layer.markers[0];
    assert_eq!(marker.icon, "대형폐기물_processed");
    assert_eq!(marker.count, 3);
    assert_eq!(marker.position.latitude, 37.0);
}

#[test]
fn test_write_layer_to_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("out").join("markers.json");

    let engine = sample_engine();
    let layer = build_marker_layer(engine.entries());
    write_layer(&layer, Some(&path)).expect("書き出し失敗");

    let content = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(value["generatedAt"].is_string());
    assert_eq!(value["markers"].as_array().unwrap().len(), 3);
    assert!(content.contains("\"memberIds\""));
    assert!(content.contains("\"kind\": \"cluster\""));
}
