use anyhow::{bail, Result};

use stockrecon::{CountAdjustment, Product, Reconciler};

use super::App;

/// Build the adjustment from mutually exclusive CLI flags.
pub fn adjustment(
    set: Option<u32>,
    add: Option<u32>,
    sub: Option<u32>,
    partials: Option<Vec<u32>>,
    add_partial: Option<u32>,
) -> Result<CountAdjustment> {
    let adjustment = match (set, add, sub, partials, add_partial) {
        (Some(n), None, None, None, None) => CountAdjustment::Set(n),
        (None, Some(n), None, None, None) => CountAdjustment::Increment(n),
        (None, None, Some(n), None, None) => CountAdjustment::Decrement(n),
        (None, None, None, Some(parts), None) => CountAdjustment::Partials(parts),
        (None, None, None, None, Some(n)) => CountAdjustment::AddPartial(n),
        _ => bail!("use exactly one of --set, --add, --sub, --partials, --add-partial"),
    };
    Ok(adjustment)
}

pub async fn cmd_count(
    app: &App,
    location: &str,
    code: &str,
    worker: &str,
    adjustment: CountAdjustment,
) -> Result<()> {
    let mut collection = app.load(location).await?;
    let mut reconciler = Reconciler::new(&app.store, &mut collection);
    let product = reconciler.count(code, adjustment, worker).await?;
    print_product("🔢 Counted", &product);
    Ok(())
}

pub async fn cmd_clear(app: &App, location: &str, code: &str) -> Result<()> {
    let mut collection = app.load(location).await?;
    let mut reconciler = Reconciler::new(&app.store, &mut collection);
    let product = reconciler.clear(code).await?;
    print_product("🧹 Cleared", &product);
    Ok(())
}

pub async fn cmd_resolve(app: &App, location: &str, code: Option<&str>, all: bool) -> Result<()> {
    let mut collection = app.load(location).await?;
    let mut reconciler = Reconciler::new(&app.store, &mut collection);

    if all {
        let resolved = reconciler.resolve_all().await?;
        println!("✅ Resolved {resolved} differences");
        return Ok(());
    }
    let Some(code) = code else {
        bail!("use --code <CODE> or --all");
    };
    let product = reconciler.resolve_difference(code).await?;
    print_product("✅ Resolved", &product);
    Ok(())
}

fn print_product(action: &str, product: &Product) {
    println!(
        "{action} #{} {} {}: real {} / system {} (difference {:+}), {:?}",
        product.correlative_index,
        product.code,
        product.name,
        product.real_quantity,
        product.system_quantity,
        product.difference(),
        product.state
    );
}
