use std::path::Path;

use anyhow::Result;

use stockrecon::intake::{DocumentSource, IntakePipeline, JsonFragmentSource};
use stockrecon::ReconError;

use super::App;

pub async fn cmd_intake(app: &App, file: &Path, location: &str) -> Result<()> {
    let pipeline = IntakePipeline::new(app.config.intake.clone())?;
    let source = open_source(file)?;

    println!("📄 Reading: {}", file.display());
    match pipeline.ingest(&app.store, location, &*source).await {
        Ok(outcome) => {
            println!(
                "✅ {} products from {} pages ({} lines)",
                outcome.collection.len(),
                outcome.pages,
                outcome.lines
            );
            let note = if outcome.report_date_found {
                ""
            } else {
                " (not found in report, using today)"
            };
            println!("   Report date: {}{note}", outcome.collection.report_date);
            println!("   Saved to location '{location}'");
            Ok(())
        }
        Err(e) if e.is_informational() => {
            println!("ℹ️  {e}. Nothing was saved.");
            Ok(())
        }
        Err(ReconError::InvalidDocumentType { message }) => {
            anyhow::bail!("{message}")
        }
        Err(e) => Err(e.into()),
    }
}

fn open_source(file: &Path) -> Result<Box<dyn DocumentSource>> {
    let is_pdf = file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    if !is_pdf {
        return Ok(Box::new(JsonFragmentSource::new(file)));
    }

    #[cfg(feature = "pdf")]
    {
        Ok(Box::new(stockrecon::intake::pdf::PdfFragmentSource::new(file)))
    }

    #[cfg(not(feature = "pdf"))]
    {
        anyhow::bail!(
            "{} is a PDF but stockrecon was built without the `pdf` feature",
            file.display()
        )
    }
}
