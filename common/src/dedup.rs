//! 位置重複チェック
//!
//! 新規登録の前に、既に表示中の地点から閾値（メートル）以内に
//! 候補地点があるかを判定する。サーバー側でも重複は弾かれるため、
//! ここでの判定はあくまで登録前の事前チェック。

use crate::error::{Error, Result};
use crate::geo::DistanceMetric;
use crate::types::GeoPoint;
use serde::{Deserialize, Serialize};

/// ポイ捨て通報の既定閾値（メートル）
pub const LITTERING_THRESHOLD_M: f64 = 5.0;

/// 廃棄物収集の既定閾値（メートル）
pub const WASTE_COLLECTION_THRESHOLD_M: f64 = 10.0;

/// 重複チェックの用途
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UseCase {
    /// ポイ捨て通報
    Littering,
    /// 廃棄物収集
    WasteCollection,
}

impl UseCase {
    pub fn default_threshold_m(&self) -> f64 {
        match self {
            UseCase::Littering => LITTERING_THRESHOLD_M,
            UseCase::WasteCollection => WASTE_COLLECTION_THRESHOLD_M,
        }
    }
}

impl std::str::FromStr for UseCase {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "littering" | "litter" => Ok(UseCase::Littering),
            "waste-collection" | "waste_collection" | "waste" => Ok(UseCase::WasteCollection),
            _ => Err(format!("Unknown use case: {}. Use littering or waste", s)),
        }
    }
}

impl std::fmt::Display for UseCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UseCase::Littering => write!(f, "littering"),
            UseCase::WasteCollection => write!(f, "waste-collection"),
        }
    }
}

fn validate_threshold(threshold_m: f64) -> Result<()> {
    if threshold_m.is_finite() && threshold_m >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidThreshold(threshold_m))
    }
}

/// 候補地点が既存地点のいずれかから閾値以内にあるか（Haversine）
///
/// # Arguments
/// * `existing` - 表示中の地点
/// * `candidate` - 新規登録しようとしている地点
/// * `threshold_m` - 閾値（メートル、境界を含む）
///
/// # Returns
/// * `Ok(true)` - 重複あり
/// * `Ok(false)` - 重複なし（`existing`が空の場合も含む）
/// * `Err` - 座標または閾値が不正
pub fn is_duplicate(existing: &[GeoPoint], candidate: &GeoPoint, threshold_m: f64) -> Result<bool> {
    is_duplicate_with(DistanceMetric::Haversine, existing, candidate, threshold_m)
}

/// 距離計算方式を指定して重複判定
pub fn is_duplicate_with(
    metric: DistanceMetric,
    existing: &[GeoPoint],
    candidate: &GeoPoint,
    threshold_m: f64,
) -> Result<bool> {
    Ok(nearest_duplicate_with(metric, existing, candidate, threshold_m)?.is_some())
}

/// 閾値以内で最も近い既存地点（インデックスと距離）
pub fn nearest_duplicate(
    existing: &[GeoPoint],
    candidate: &GeoPoint,
    threshold_m: f64,
) -> Result<Option<(usize, f64)>> {
    nearest_duplicate_with(DistanceMetric::Haversine, existing, candidate, threshold_m)
}

pub fn nearest_duplicate_with(
    metric: DistanceMetric,
    existing: &[GeoPoint],
    candidate: &GeoPoint,
    threshold_m: f64,
) -> Result<Option<(usize, f64)>> {
    candidate.validate()?;
    validate_threshold(threshold_m)?;

    let mut nearest: Option<(usize, f64)> = None;
    for (idx, point) in existing.iter().enumerate() {
        point.validate()?;
        let distance = metric.measure(point, candidate);
        if distance > threshold_m {
            continue;
        }
        match nearest {
            Some((_, best)) if best <= distance => {}
            _ => nearest = Some((idx, distance)),
        }
    }

    Ok(nearest)
}
