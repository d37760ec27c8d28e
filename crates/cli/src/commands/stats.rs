//! Dashboard statistics command

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use trafdesk_business::{DeletionService, OffenseService, PaymentService, ServiceContext};
use trafdesk_reports::{
    CsvExporter, DeletionQueueStats, JsonExporter, OffenseStats, PaymentStats, ReportData,
    ReportExporter,
};

use crate::db;
use crate::StatsFormat;

pub async fn show(
    db_path: &Path,
    acting_as: Option<&str>,
    format: StatsFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let pool = db::connect(db_path).await?;
    let actor = db::resolve_actor(&pool, acting_as).await?;
    let ctx = ServiceContext::new(pool.clone());

    // Role scoping comes from the services: drivers get stats over
    // their own records only
    let offenses = OffenseService::new(&ctx).list(&actor).await?;
    let payments = PaymentService::new(&ctx).list(&actor).await?;

    let offense_stats = OffenseStats::from_offenses(&offenses);
    let payment_stats = PaymentStats::from_data(&payments, &offenses);

    let rendered = match format {
        StatsFormat::Table => render_table(&offense_stats, &payment_stats),
        StatsFormat::Csv => {
            let exporter = CsvExporter::new();
            format!(
                "{}\n{}",
                exporter.export(&offense_stats),
                exporter.export(&payment_stats)
            )
        }
        StatsFormat::Json => {
            let exporter = JsonExporter::new();
            format!(
                "[{},{}]",
                exporter.export(&offense_stats),
                exporter.export(&payment_stats)
            )
        }
    };

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write {path:?}"))?;
            println!("✅ Report written to {path:?}");
        }
        None => println!("{rendered}"),
    }

    // Queue counts for those allowed to see the queue
    let deletion_service = DeletionService::new(&ctx);
    if let Ok(views) = deletion_service.list(&actor).await {
        let requests: Vec<_> = views.into_iter().map(|v| v.request).collect();
        let queue = DeletionQueueStats::from_requests(&requests);
        println!();
        println!(
            "🗂  Deletion queue: {} pending, {} approved, {} rejected",
            queue.pending, queue.approved, queue.rejected
        );
    }

    pool.close().await;
    Ok(())
}

fn render_table(offenses: &OffenseStats, payments: &PaymentStats) -> String {
    let mut out = String::new();
    for report in [offenses as &dyn ReportData, payments as &dyn ReportData] {
        out.push_str(&format!("📈 {}\n", report.title()));
        for (key, value) in report.summary() {
            out.push_str(&format!("   {key:<18} {value}\n"));
        }
        for row in report.rows() {
            out.push_str(&format!("   {:<18} {}\n", row[0], row[1]));
        }
        out.push('\n');
    }
    out
}
