//! 地図レイヤー出力
//!
//! エンジンのマーカー／処理履歴グループを地図ウィジェットに渡す形
//! （種別・位置・タイトル・所属ID）に変換し、JSONで書き出す。

use crate::error::Result;
use geo_cluster_common::grouping::NO_ADDRESS_LABEL;
use geo_cluster_common::{GeoPoint, HistoryGroup, MarkerEntry, ReportId, SourceType};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// マーカーアイコンの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Cluster,
    Field,
    Online,
}

impl MarkerKind {
    fn of(entry: &MarkerEntry) -> Self {
        if entry.is_cluster {
            return MarkerKind::Cluster;
        }
        match entry.report.source_type {
            SourceType::Field => MarkerKind::Field,
            SourceType::Online => MarkerKind::Online,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    pub kind: MarkerKind,
    pub position: GeoPoint,
    pub title: String,
    pub member_ids: Vec<ReportId>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerLayer {
    pub generated_at: String,
    pub markers: Vec<MapMarker>,
}

/// 処理履歴マップのマーカー
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryMarker {
    /// `{代表種別}_processed`
    pub icon: String,
    pub position: GeoPoint,
    pub address: String,
    pub count: usize,
    pub member_ids: Vec<ReportId>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryLayer {
    pub generated_at: String,
    pub markers: Vec<HistoryMarker>,
}

/// マーカータイトル（クラスタは件数つき）
pub fn marker_title(entry: &MarkerEntry) -> String {
    let address = entry.report.address.trim();
    let address = if address.is_empty() { NO_ADDRESS_LABEL } else { address };
    if entry.is_cluster {
        format!("{} ({}건)", address, entry.members.len())
    } else {
        address.to_string()
    }
}

pub fn build_marker_layer(entries: &[MarkerEntry]) -> MarkerLayer {
    let markers = entries
        .iter()
        .map(|entry| MapMarker {
            kind: MarkerKind::of(entry),
            position: entry.position(),
            title: marker_title(entry),
            member_ids: entry.member_ids(),
        })
        .collect();

    MarkerLayer {
        generated_at: timestamp(),
        markers,
    }
}

pub fn build_history_layer(groups: &[HistoryGroup]) -> HistoryLayer {
    let markers = groups
        .iter()
        .filter_map(|group| {
            let first = group.members.first()?;
            Some(HistoryMarker {
                icon: format!("{}_processed", group.dominant_waste_type),
                position: GeoPoint {
                    latitude: first.latitude,
                    longitude: first.longitude,
                },
                address: group.address.clone(),
                count: group.members.len(),
                member_ids: group.members.iter().map(|r| r.id).collect(),
            })
        })
        .collect();

    HistoryLayer {
        generated_at: timestamp(),
        markers,
    }
}

/// レイヤーをJSONで書き出す（出力先なしは標準出力）
pub fn write_layer<T: Serialize>(layer: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(layer)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, json)?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}

fn timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}
