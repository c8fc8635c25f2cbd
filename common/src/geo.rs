//! 2点間距離（メートル）

use crate::types::GeoPoint;
use serde::{Deserialize, Serialize};

/// 地球半径（メートル）
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// 距離計算方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// 大円距離
    #[default]
    Haversine,
    /// 正距円筒近似（短距離向け）
    Equirectangular,
}

impl DistanceMetric {
    pub fn measure(&self, a: &GeoPoint, b: &GeoPoint) -> f64 {
        match self {
            DistanceMetric::Haversine => haversine_distance(a, b),
            DistanceMetric::Equirectangular => equirectangular_distance(a, b),
        }
    }
}

impl std::str::FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "haversine" => Ok(DistanceMetric::Haversine),
            "equirectangular" | "equirect" => Ok(DistanceMetric::Equirectangular),
            _ => Err(format!("Unknown metric: {}. Use haversine or equirectangular", s)),
        }
    }
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistanceMetric::Haversine => write!(f, "haversine"),
            DistanceMetric::Equirectangular => write!(f, "equirectangular"),
        }
    }
}

/// Haversine公式による大円距離
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // 丸め誤差で1をわずかに超えることがある
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_RADIUS_M * c
}

/// 正距円筒近似
///
/// 数百メートル以内なら Haversine との差は無視できる。
pub fn equirectangular_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let mean_phi = ((a.latitude + b.latitude) / 2.0).to_radians();
    let x = wrap_longitude_delta(b.longitude - a.longitude).to_radians() * mean_phi.cos();
    let y = (b.latitude - a.latitude).to_radians();
    EARTH_RADIUS_M * x.hypot(y)
}

/// 経度差を[-180, 180]に収める（日付変更線をまたぐ場合）
fn wrap_longitude_delta(delta: f64) -> f64 {
    if delta > 180.0 {
        delta - 360.0
    } else if delta < -180.0 {
        delta + 360.0
    } else {
        delta
    }
}
