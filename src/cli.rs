use clap::{Parser, Subcommand};
use geo_cluster_common::{DistanceMetric, UseCase};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "geo-cluster")]
#[command(about = "通報地点の重複チェック・住所クラスタリングツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 通報一覧から地図マーカー（単独/クラスタ）を生成
    Markers {
        /// 通報一覧JSON（`-` で標準入力）
        #[arg(required = true)]
        feed: PathBuf,

        /// 出力JSONファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 新規登録地点の重複チェック
    Check {
        /// 通報一覧JSON（`-` で標準入力）
        #[arg(required = true)]
        feed: PathBuf,

        /// 緯度
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// 経度
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// 用途 (littering/waste)
        #[arg(short, long, default_value = "waste")]
        use_case: UseCase,

        /// 閾値（メートル、設定値より優先）
        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// 処理済み通報の履歴マップを生成
    History {
        /// 通報一覧JSON（`-` で標準入力）
        #[arg(required = true)]
        feed: PathBuf,

        /// 出力JSONファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 閾値を設定（例: littering=5）
        #[arg(long, value_name = "USE_CASE=METERS")]
        set_threshold: Option<String>,

        /// 距離計算方式 (haversine/equirectangular)
        #[arg(long)]
        metric: Option<DistanceMetric>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
