use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use activity_participation::clock::{Clock, FixedClock, SystemClock};
use activity_participation::config::ReportConfig;
use activity_participation::models::decode_activity_records;
use activity_participation::services::activity_card_service;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match ReportConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("participation report: {}", e);
            std::process::exit(2);
        }
    };

    let now = match config.now {
        Some(at) => FixedClock(at).now(),
        None => SystemClock.now(),
    };
    info!(
        build_id = env!("PARTICIPATION_BUILD_ID"),
        viewer = %config.viewer_id,
        now = %now.to_rfc3339(),
        path = %config.activities_path.display(),
        "participation_report_start"
    );

    let raw = match tokio::fs::read_to_string(&config.activities_path).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!(
                "participation report: cannot read {}: {}",
                config.activities_path.display(),
                e
            );
            std::process::exit(1);
        }
    };

    let decoded = match decode_activity_records(&raw) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("participation report: activities file is not a JSON array: {}", e);
            std::process::exit(1);
        }
    };

    let mut failed = 0usize;
    for (index, record) in decoded.iter().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                failed += 1;
                warn!(index, error = %e, "participation_report_record_undecodable");
                println!("#{}\terror\t{}", index, e);
                continue;
            }
        };
        match activity_card_service::build_activity_card_view(record, &config.viewer_id, now) {
            Ok(card) => println!(
                "{}\t{}\t{}\t{}\t{}",
                card.activity_id,
                card.status_label,
                card.primary_action.as_str(),
                card.strategy,
                card.title
            ),
            Err(e) => {
                failed += 1;
                warn!(activity_id = %record.id, error = %e, "participation_report_record_failed");
                println!("{}\terror\t{}", record.id, e);
            }
        }
    }

    println!(
        "participation report: activities={}, failed={}",
        decoded.len(),
        failed
    );
    if failed > 0 {
        std::process::exit(1);
    }
}
