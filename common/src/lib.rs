//! Geo Cluster Common Library
//!
//! 位置情報つき通報の重複チェックと住所クラスタリング。
//! DOM・通信に依存しない純粋なロジックのみ。

pub mod types;
pub mod error;
pub mod geo;
pub mod dedup;
pub mod grouping;
pub mod engine;
pub mod parser;

pub use types::{GeoPoint, Report, ReportId, ReportStatus, SourceType};
pub use error::{Error, Result};
pub use geo::{DistanceMetric, haversine_distance, equirectangular_distance};
pub use dedup::{UseCase, is_duplicate, is_duplicate_with, nearest_duplicate};
pub use grouping::{ClusterGroup, HistoryGroup, filter_active, group_by_address, group_history, normalize_address};
pub use engine::{GeoClusterEngine, MarkerEntry};
pub use parser::parse_report_feed;
