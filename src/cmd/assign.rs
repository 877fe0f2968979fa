use std::path::Path;

use anyhow::Result;

use stockrecon::inventory::load_roster;
use stockrecon::{distribute_and_save, Worker};

use super::App;

pub async fn cmd_assign(
    app: &App,
    location: &str,
    roster: &Path,
    start: usize,
    role: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut workers = load_roster(roster)?;
    if let Some(role) = role {
        workers = Worker::filter_by_role(&workers, role);
    }

    let mut collection = app.load(location).await?;
    let ranges = distribute_and_save(&app.store, &mut collection, &workers, start).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ranges)?);
        return Ok(());
    }

    println!(
        "👥 {} products across {} workers, starting at #{start}",
        collection.len(),
        workers.len()
    );
    for range in &ranges {
        let name = workers
            .iter()
            .find(|w| w.code == range.worker_code)
            .map_or("", |w| w.display_name.as_str());
        println!(
            "   {:<8} {:<20} #{} → #{} ({} items)",
            range.worker_code, name, range.first_correlative, range.last_correlative, range.count
        );
    }
    Ok(())
}
