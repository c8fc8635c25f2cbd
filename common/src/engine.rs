//! マーカー管理エンジン
//!
//! 表示中のマーカー（単独 or クラスタ）をフラットなリストで保持する。
//! 1つの通報IDは常に高々1つのマーカーにしか属さない。
//!
//! ## ライフサイクル
//! 未表示 → 表示中（単独 / クラスタの一員） → 削除済み
//!
//! 削除済みのIDは `load` で一覧を取り直すまで再表示しない
//! （取得が重なって古い結果が後から届いた場合も同様）。

use crate::dedup;
use crate::error::Result;
use crate::geo::DistanceMetric;
use crate::grouping::{self, ClusterGroup};
use crate::types::{GeoPoint, Report, ReportId, SourceType};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// 地図上の1マーカー
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerEntry {
    /// 代表レコード（先頭メンバー、マーカー位置）
    pub report: Report,
    pub is_cluster: bool,
    /// このマーカーが表す全レコード（単独なら`[report]`）
    pub members: Vec<Report>,
    /// オンライン申請の正規化住所（住所なしは空文字）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_key: Option<String>,
}

impl MarkerEntry {
    fn from_group(group: ClusterGroup) -> Self {
        let group_key = match group.source_type {
            SourceType::Online => Some(group.key),
            SourceType::Field => None,
        };
        let mut entry = Self {
            report: group.members[0].clone(),
            is_cluster: false,
            members: group.members,
            group_key,
        };
        entry.refresh();
        entry
    }

    fn single(report: Report, group_key: Option<String>) -> Self {
        Self {
            report: report.clone(),
            is_cluster: false,
            members: vec![report],
            group_key,
        }
    }

    fn refresh(&mut self) {
        if let Some(first) = self.members.first() {
            self.report = first.clone();
        }
        self.is_cluster = self.members.len() >= 2;
    }

    /// マーカー位置（代表レコードの座標）
    pub fn position(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.report.latitude,
            longitude: self.report.longitude,
        }
    }

    pub fn contains(&self, id: ReportId) -> bool {
        self.members.iter().any(|r| r.id == id)
    }

    pub fn member_ids(&self) -> Vec<ReportId> {
        self.members.iter().map(|r| r.id).collect()
    }
}

/// クラスタ判定に使うキー（オンライン申請のみ）
fn group_key_for(report: &Report) -> Option<String> {
    match report.source_type {
        SourceType::Online => Some(grouping::normalize_address(&report.address)),
        SourceType::Field => None,
    }
}

/// 同じIDが複数回あれば後のレコードで上書きする（位置は初出のまま）
fn collapse_by_id(reports: &[Report]) -> Vec<Report> {
    let mut collapsed: Vec<Report> = Vec::with_capacity(reports.len());
    let mut index_by_id: HashMap<ReportId, usize> = HashMap::new();

    for report in reports {
        match index_by_id.get(&report.id) {
            Some(&idx) => collapsed[idx] = report.clone(),
            None => {
                index_by_id.insert(report.id, collapsed.len());
                collapsed.push(report.clone());
            }
        }
    }
    collapsed
}

/// 1画面分のマーカー状態
#[derive(Debug, Clone, Default)]
pub struct GeoClusterEngine {
    entries: Vec<MarkerEntry>,
    removed: HashSet<ReportId>,
    metric: DistanceMetric,
}

impl GeoClusterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metric(metric: DistanceMetric) -> Self {
        Self {
            metric,
            ..Self::default()
        }
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// 一覧を取り直してマーカーを作り直す
    ///
    /// 削除済みIDの記録もクリアされる。同じIDが重複していれば後のレコードを採用する。
    /// 座標が不正なレコードが1件でもあれば状態は変更せずにエラーを返す。
    pub fn load(&mut self, reports: &[Report]) -> Result<&[MarkerEntry]> {
        let reports = collapse_by_id(reports);
        for report in reports.iter().filter(|r| !r.is_hidden()) {
            report.point()?;
        }

        self.entries = grouping::group_by_address(&reports)
            .into_iter()
            .map(MarkerEntry::from_group)
            .collect();
        self.removed.clear();

        debug!(
            reports = reports.len(),
            markers = self.entries.len(),
            clusters = self.entries.iter().filter(|e| e.is_cluster).count(),
            "loaded markers"
        );

        Ok(self.entries.as_slice())
    }

    /// 通報を追加または更新する
    ///
    /// # Returns
    /// * `Ok(Some(entry))` - 追加/更新後、その通報を含むマーカー
    /// * `Ok(None)` - 削除済みのID、または処理済み・削除済みの通報（表示しない）
    /// * `Err` - 座標が不正
    pub fn upsert_marker(&mut self, report: Report) -> Result<Option<&MarkerEntry>> {
        report.point()?;

        if self.removed.contains(&report.id) {
            debug!(id = report.id, "ignored upsert for removed report");
            return Ok(None);
        }

        if report.is_hidden() {
            self.remove_marker(report.id);
            return Ok(None);
        }

        let key = group_key_for(&report);

        if let Some(idx) = self.entry_index(report.id) {
            if self.entries[idx].group_key == key {
                let entry = &mut self.entries[idx];
                if let Some(member) = entry.members.iter_mut().find(|m| m.id == report.id) {
                    *member = report;
                }
                entry.refresh();
                debug!(id = entry.report.id, "updated marker in place");
                return Ok(self.entries.get(idx));
            }
            // 住所が変わった場合は付け替え
            self.detach(report.id);
        }

        let idx = self.insert(report, key);
        Ok(self.entries.get(idx))
    }

    /// 通報のマーカーを削除する
    ///
    /// 既に無いIDでもエラーにはしない。
    ///
    /// # Returns
    /// 実際に削除したかどうか
    pub fn remove_marker(&mut self, id: ReportId) -> bool {
        let removed = self.detach(id).is_some();
        self.removed.insert(id);
        debug!(id, removed, "remove marker");
        removed
    }

    pub fn entries(&self) -> &[MarkerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 通報IDを含むマーカー
    pub fn get(&self, id: ReportId) -> Option<&MarkerEntry> {
        self.entries.iter().find(|e| e.contains(id))
    }

    pub fn contains(&self, id: ReportId) -> bool {
        self.get(id).is_some()
    }

    pub fn is_removed(&self, id: ReportId) -> bool {
        self.removed.contains(&id)
    }

    /// 全マーカーの位置
    pub fn positions(&self) -> Vec<GeoPoint> {
        self.entries.iter().map(MarkerEntry::position).collect()
    }

    /// 表示中のマーカーに対する重複チェック
    pub fn is_duplicate_location(&self, candidate: &GeoPoint, threshold_m: f64) -> Result<bool> {
        dedup::is_duplicate_with(self.metric, &self.positions(), candidate, threshold_m)
    }

    /// 閾値以内で最も近いマーカーと距離
    pub fn nearest_duplicate(
        &self,
        candidate: &GeoPoint,
        threshold_m: f64,
    ) -> Result<Option<(&MarkerEntry, f64)>> {
        let nearest =
            dedup::nearest_duplicate_with(self.metric, &self.positions(), candidate, threshold_m)?;
        Ok(nearest.map(|(idx, distance)| (&self.entries[idx], distance)))
    }

    fn entry_index(&self, id: ReportId) -> Option<usize> {
        self.entries.iter().position(|e| e.contains(id))
    }

    fn insert(&mut self, report: Report, key: Option<String>) -> usize {
        if let Some(key) = key.as_deref() {
            if let Some(idx) = self
                .entries
                .iter()
                .position(|e| e.group_key.as_deref() == Some(key))
            {
                let entry = &mut self.entries[idx];
                entry.members.push(report);
                entry.refresh();
                debug!(key, members = entry.members.len(), "joined cluster");
                return idx;
            }
        }

        debug!(id = report.id, "added marker");
        self.entries.push(MarkerEntry::single(report, key));
        self.entries.len() - 1
    }

    /// メンバーから外す（空になったマーカーは消す）
    fn detach(&mut self, id: ReportId) -> Option<Report> {
        let idx = self.entry_index(id)?;
        let entry = &mut self.entries[idx];
        let pos = entry.members.iter().position(|m| m.id == id)?;
        let report = entry.members.remove(pos);

        if entry.members.is_empty() {
            self.entries.remove(idx);
        } else {
            entry.refresh();
        }
        Some(report)
    }
}
