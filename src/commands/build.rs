//! Build the static site

use anyhow::Result;

use crate::generator::{BuildReport, Generator};
use crate::Site;

/// Run a full build and report the outcome
pub fn run(site: &Site) -> Result<BuildReport> {
    let start = std::time::Instant::now();

    let generator = Generator::new(site)?;
    let report = generator.build()?;

    for err in &report.skipped {
        tracing::warn!("Skipped: {}", err);
    }

    let duration = start.elapsed();
    tracing::info!(
        "Wrote {} files in {:.2}s ({} skipped)",
        report.written,
        duration.as_secs_f64(),
        report.skipped.len()
    );

    Ok(report)
}
