use anyhow::Context;
use clap::Parser;
use geo_cluster::{cli, config, error, feed, layer};
use geo_cluster_common::{group_history, GeoClusterEngine, GeoPoint};
use cli::{Cli, Commands};
use config::{parse_threshold_assignment, Config};
use error::GeoClusterError;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load().context("設定の読み込みに失敗しました")?;

    match cli.command {
        Commands::Markers { feed: feed_path, output } => {
            let reports = feed::load_reports(&feed_path).await?;
            eprintln!("✔ {}件の通報を読み込み", reports.len());

            let mut engine = GeoClusterEngine::with_metric(config.metric);
            let entries = engine.load(&reports)?;
            let clusters = entries.iter().filter(|e| e.is_cluster).count();
            eprintln!("✔ マーカー {}件 (クラスタ {}件)", entries.len(), clusters);

            let marker_layer = layer::build_marker_layer(entries);
            layer::write_layer(&marker_layer, output.as_deref())?;
            if let Some(path) = output {
                eprintln!("✔ 出力: {}", path.display());
            }
        }

        Commands::Check { feed: feed_path, lat, lng, use_case, threshold } => {
            let candidate = GeoPoint::new(lat, lng)?;
            let threshold_m = match threshold {
                Some(t) => t,
                None => config.threshold_for(use_case)?,
            };

            let reports = feed::load_reports(&feed_path).await?;
            let mut engine = GeoClusterEngine::with_metric(config.metric);
            engine.load(&reports)?;

            println!("📍 重複チェック ({}, 閾値 {}m, {})", use_case, threshold_m, engine.metric());
            match engine.nearest_duplicate(&candidate, threshold_m)? {
                Some((entry, distance_m)) => {
                    return Err(GeoClusterError::DuplicateLocation {
                        id: entry.report.id,
                        distance_m,
                    }
                    .into());
                }
                None => println!("✔ 重複なし: 登録できます"),
            }
        }

        Commands::History { feed: feed_path, output } => {
            let reports = feed::load_reports(&feed_path).await?;
            let groups = group_history(&reports);
            eprintln!("✔ 処理済み {}件の住所", groups.len());

            let history_layer = layer::build_history_layer(&groups);
            layer::write_layer(&history_layer, output.as_deref())?;
            if let Some(path) = output {
                eprintln!("✔ 出力: {}", path.display());
            }
        }

        Commands::Config { set_threshold, metric, show } => {
            let mut config = config;
            let changed = set_threshold.is_some() || metric.is_some();

            if let Some(assignment) = set_threshold {
                let (use_case, meters) = parse_threshold_assignment(&assignment)?;
                config.set_threshold(use_case, meters)?;
                println!("✔ {} の閾値を {}m に設定しました", use_case, meters);
            }

            if let Some(metric) = metric {
                config.metric = metric;
                println!("✔ 距離計算方式を {} に設定しました", metric);
            }

            if changed {
                config.save()?;
            }

            if show || !changed {
                println!("設定:");
                println!("  ポイ捨て閾値: {}m", config.littering_threshold_m);
                println!("  廃棄物収集閾値: {}m", config.waste_collection_threshold_m);
                println!("  距離計算方式: {}", config.metric);
                if let Ok(path) = Config::config_path() {
                    println!("  ファイル: {}", path.display());
                }
            }
        }
    }

    Ok(())
}
