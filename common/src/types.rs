//! 通報データの型定義
//!
//! CLIとエンジンで共有される型:
//! - GeoPoint: 検証済みの緯度経度
//! - Report: バックエンドから取得した通報レコード
//! - SourceType / ReportStatus: 登録経路と処理状態

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// 通報ID
pub type ReportId = u64;

/// 緯度経度
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// 範囲チェック付きで生成
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let point = Self { latitude, longitude };
        point.validate()?;
        Ok(point)
    }

    /// 有限値かつ緯度[-90,90]・経度[-180,180]であることを確認
    pub fn validate(&self) -> Result<()> {
        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lng_ok = self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lng_ok {
            Ok(())
        } else {
            Err(Error::InvalidPoint {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

/// 登録経路
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// 現場登録（常に個別表示）
    Field,
    /// オンライン排出申請
    Online,
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceType::Field => write!(f, "field"),
            SourceType::Online => write!(f, "online"),
        }
    }
}

/// 処理状態
///
/// バックエンドのワークフロー状態（unprocessed/pending/confirmed/approved）は
/// 地図表示上はすべて未処理扱い。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    #[serde(alias = "unprocessed", alias = "pending", alias = "confirmed", alias = "approved")]
    Active,
    Processed,
    /// 管理者が削除した通報（ゴミ箱一覧にのみ出る）
    Deleted,
}

/// 通報レコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: ReportId,

    #[serde(deserialize_with = "deserialize_coordinate")]
    pub latitude: f64,

    #[serde(deserialize_with = "deserialize_coordinate")]
    pub longitude: f64,

    #[serde(default)]
    pub address: String,

    #[serde(default, alias = "created_at")]
    pub created_at: String,

    /// ポイ捨て通報の行には`type`列が無い（現場登録扱い）
    #[serde(rename = "type", alias = "sourceType", default = "default_source_type")]
    pub source_type: SourceType,

    #[serde(default)]
    pub status: ReportStatus,

    /// 廃棄物の種類（処理履歴の代表種別判定に使用）
    #[serde(default, alias = "waste_type", skip_serializing_if = "Option::is_none")]
    pub waste_type: Option<String>,
}

impl Report {
    pub fn new(
        id: ReportId,
        latitude: f64,
        longitude: f64,
        address: impl Into<String>,
        source_type: SourceType,
    ) -> Self {
        Self {
            id,
            latitude,
            longitude,
            address: address.into(),
            created_at: String::new(),
            source_type,
            status: ReportStatus::Active,
            waste_type: None,
        }
    }

    pub fn with_status(mut self, status: ReportStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = created_at.into();
        self
    }

    pub fn with_waste_type(mut self, waste_type: impl Into<String>) -> Self {
        self.waste_type = Some(waste_type.into());
        self
    }

    /// 検証済みの位置
    pub fn point(&self) -> Result<GeoPoint> {
        GeoPoint::new(self.latitude, self.longitude)
    }

    pub fn is_processed(&self) -> bool {
        self.status == ReportStatus::Processed
    }

    /// 地図に表示しない通報（処理済み・削除済み）
    pub fn is_hidden(&self) -> bool {
        matches!(self.status, ReportStatus::Processed | ReportStatus::Deleted)
    }
}

fn default_source_type() -> SourceType {
    SourceType::Field
}

// DECIMAL列は文字列で返ってくることがある
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Integer(u64),
    Float(f64),
    Text(String),
}

fn deserialize_coordinate<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Integer(n) => Ok(n as f64),
        NumberOrString::Float(n) => Ok(n),
        NumberOrString::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid coordinate {:?}: {}", s, e))),
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<ReportId, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Integer(n) => Ok(n),
        NumberOrString::Float(n) if n >= 0.0 && n.fract() == 0.0 => Ok(n as ReportId),
        NumberOrString::Float(n) => Err(serde::de::Error::custom(format!("invalid id: {}", n))),
        NumberOrString::Text(s) => s
            .trim()
            .parse::<ReportId>()
            .map_err(|e| serde::de::Error::custom(format!("invalid id {:?}: {}", s, e))),
    }
}
