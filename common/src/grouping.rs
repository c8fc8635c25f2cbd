//! 住所によるグループ化
//!
//! - 未処理の通報: 地図表示用のクラスタ（同一住所のオンライン申請をまとめる）
//! - 処理済みの通報: 処理履歴マップ用のグループ（代表種別つき）

use crate::types::{Report, SourceType};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// 住所なしの処理履歴に付けるラベル
pub const NO_ADDRESS_LABEL: &str = "주소 없음";

/// 種別なしの通報の既定種別
pub const DEFAULT_WASTE_TYPE: &str = "생활폐기물";

/// 地図表示用のグループ
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterGroup {
    /// 正規化済み住所（現場登録は空）
    pub key: String,
    pub source_type: SourceType,
    pub members: Vec<Report>,
}

impl ClusterGroup {
    fn singleton(report: Report) -> Self {
        Self {
            key: String::new(),
            source_type: report.source_type,
            members: vec![report],
        }
    }

    /// 2件以上ならクラスタマーカーとして表示
    pub fn is_cluster(&self) -> bool {
        self.members.len() >= 2
    }

    /// マーカー位置を決める代表レコード（先頭）
    pub fn anchor(&self) -> &Report {
        &self.members[0]
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// 処理履歴のグループ
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryGroup {
    pub address: String,
    pub dominant_waste_type: String,
    pub members: Vec<Report>,
}

/// 住所を正規化する
///
/// 前後の空白除去、連続空白の1文字化、小文字化。
pub fn normalize_address(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// 処理済み・削除済みを除外する
pub fn filter_active(reports: &[Report]) -> Vec<Report> {
    reports.iter().filter(|r| !r.is_hidden()).cloned().collect()
}

/// 地図表示用にグループ化する
///
/// - 処理済み・削除済みは含めない
/// - 現場登録は住所が重なっても常に1件ずつ
/// - オンライン申請は正規化住所が同じものを1グループに（住所が空同士も同じ）
///
/// 出力順は「現場登録 → オンライン」でそれぞれ初出順だが、
/// 呼び出し側は順序に依存しないこと。
pub fn group_by_address(reports: &[Report]) -> Vec<ClusterGroup> {
    let mut field_groups = Vec::new();
    let mut online_groups: Vec<ClusterGroup> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();
    let mut skipped = 0usize;

    for report in reports {
        if report.is_hidden() {
            skipped += 1;
            continue;
        }

        match report.source_type {
            SourceType::Field => field_groups.push(ClusterGroup::singleton(report.clone())),
            SourceType::Online => {
                let key = normalize_address(&report.address);
                match index_by_key.get(&key) {
                    Some(&idx) => online_groups[idx].members.push(report.clone()),
                    None => {
                        index_by_key.insert(key.clone(), online_groups.len());
                        online_groups.push(ClusterGroup {
                            key,
                            source_type: SourceType::Online,
                            members: vec![report.clone()],
                        });
                    }
                }
            }
        }
    }

    debug!(
        field = field_groups.len(),
        online = online_groups.len(),
        skipped_hidden = skipped,
        "grouped reports by address"
    );

    field_groups.extend(online_groups);
    field_groups
}

/// 処理済みの通報を住所ごとにまとめる
///
/// 代表種別は最頻出の種別。同数なら先に出た種別。
pub fn group_history(reports: &[Report]) -> Vec<HistoryGroup> {
    let mut groups: Vec<HistoryGroup> = Vec::new();
    let mut index_by_address: HashMap<String, usize> = HashMap::new();

    for report in reports.iter().filter(|r| r.is_processed()) {
        let trimmed = report.address.trim();
        let address = if trimmed.is_empty() { NO_ADDRESS_LABEL } else { trimmed };

        match index_by_address.get(address) {
            Some(&idx) => groups[idx].members.push(report.clone()),
            None => {
                index_by_address.insert(address.to_string(), groups.len());
                groups.push(HistoryGroup {
                    address: address.to_string(),
                    dominant_waste_type: String::new(),
                    members: vec![report.clone()],
                });
            }
        }
    }

    for group in &mut groups {
        group.dominant_waste_type = dominant_waste_type(&group.members);
    }

    groups
}

/// 最頻出の種別（同数は初出優先）
pub fn dominant_waste_type(reports: &[Report]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for report in reports {
        let waste_type = report
            .waste_type
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(DEFAULT_WASTE_TYPE);
        match counts.iter_mut().find(|(t, _)| *t == waste_type) {
            Some((_, count)) => *count += 1,
            None => counts.push((waste_type, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (waste_type, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((waste_type, count));
        }
    }

    best.map(|(t, _)| t).unwrap_or(DEFAULT_WASTE_TYPE).to_string()
}
