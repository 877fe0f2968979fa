use std::path::Path;

use anyhow::Result;
use serde_json::json;

use stockrecon::inventory::load_roster;
use stockrecon::reconcile::worker_progress;
use stockrecon::store::CollectionRecord;
use stockrecon::{derive_ranges, summarize};

use super::App;

pub async fn cmd_show(app: &App, location: &str, roster: Option<&Path>, json: bool) -> Result<()> {
    let collection = app.load(location).await?;
    let summary = summarize(&collection);
    let workers = roster.map(load_roster).transpose()?.unwrap_or_default();
    let ranges = derive_ranges(&collection, &workers);

    if json {
        let value = json!({
            "collection": CollectionRecord::from(&collection),
            "summary": summary,
            "ranges": ranges,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "📦 {location} | report {} | processed {}",
        collection.report_date,
        collection.processed_at.format("%Y-%m-%d %H:%M")
    );
    println!(
        "{:>4}  {:<12} {:<30} {:>6} {:>6} {:>6}  {:<8} {:<8}",
        "#", "CODE", "NAME", "SYS", "REAL", "DIFF", "STATE", "WORKER"
    );
    for product in &collection {
        println!(
            "{:>4}  {:<12} {:<30} {:>6} {:>6} {:>+6}  {:<8} {:<8}",
            product.correlative_index,
            product.code,
            truncate(&product.name, 30),
            product.system_quantity,
            product.real_quantity,
            product.difference(),
            format!("{:?}", product.state),
            product.assigned_worker.as_deref().unwrap_or("-"),
        );
    }

    println!(
        "\n📊 {} products: {} reviewed, {} pending | {} matching, {} surplus, {} shortage | net {:+}",
        summary.total,
        summary.reviewed,
        summary.pending,
        summary.matching,
        summary.surplus,
        summary.shortage,
        summary.net_difference
    );

    if !workers.is_empty() {
        println!("\n👥 Assignments:");
        let progress = worker_progress(&collection, &workers);
        for range in &ranges {
            let reviewed = progress
                .iter()
                .find(|p| p.worker_code == range.worker_code)
                .map_or(0, |p| p.reviewed);
            println!(
                "   {:<8} #{} → #{}  {reviewed}/{} reviewed",
                range.worker_code, range.first_correlative, range.last_correlative, range.count
            );
        }
    }
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('…');
    out
}
