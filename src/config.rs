use crate::error::{GeoClusterError, Result};
use geo_cluster_common::{DistanceMetric, UseCase};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 全用途の閾値を上書きする環境変数
pub const THRESHOLD_ENV: &str = "GEO_CLUSTER_THRESHOLD_M";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ポイ捨て通報の重複閾値（メートル）
    pub littering_threshold_m: f64,
    /// 廃棄物収集の重複閾値（メートル）
    pub waste_collection_threshold_m: f64,
    pub metric: DistanceMetric,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            littering_threshold_m: UseCase::Littering.default_threshold_m(),
            waste_collection_threshold_m: UseCase::WasteCollection.default_threshold_m(),
            metric: DistanceMetric::Haversine,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| GeoClusterError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("geo-cluster").join("config.json"))
    }

    /// 用途ごとの閾値（環境変数を優先）
    pub fn threshold_for(&self, use_case: UseCase) -> Result<f64> {
        if let Ok(value) = std::env::var(THRESHOLD_ENV) {
            return parse_threshold(&value);
        }

        Ok(match use_case {
            UseCase::Littering => self.littering_threshold_m,
            UseCase::WasteCollection => self.waste_collection_threshold_m,
        })
    }

    pub fn set_threshold(&mut self, use_case: UseCase, meters: f64) -> Result<()> {
        check_threshold(meters)?;
        match use_case {
            UseCase::Littering => self.littering_threshold_m = meters,
            UseCase::WasteCollection => self.waste_collection_threshold_m = meters,
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        check_threshold(self.littering_threshold_m)?;
        check_threshold(self.waste_collection_threshold_m)
    }
}

/// `USE_CASE=METERS` 形式の設定値
pub fn parse_threshold_assignment(s: &str) -> Result<(UseCase, f64)> {
    let (use_case, meters) = s
        .split_once('=')
        .ok_or_else(|| GeoClusterError::InvalidArgument(format!("USE_CASE=METERS の形式で指定してください: {}", s)))?;
    let use_case: UseCase = use_case
        .trim()
        .parse()
        .map_err(GeoClusterError::InvalidArgument)?;
    Ok((use_case, parse_threshold(meters)?))
}

fn parse_threshold(s: &str) -> Result<f64> {
    let meters: f64 = s
        .trim()
        .parse()
        .map_err(|_| GeoClusterError::Config(format!("閾値が数値ではありません: {}", s)))?;
    check_threshold(meters)?;
    Ok(meters)
}

fn check_threshold(meters: f64) -> Result<()> {
    if meters.is_finite() && meters >= 0.0 {
        Ok(())
    } else {
        Err(GeoClusterError::Config(format!("閾値は0以上のメートル値で指定してください: {}", meters)))
    }
}
