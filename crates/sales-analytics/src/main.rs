mod bootstrap;
mod pipeline;
mod prompt;

use std::process::ExitCode;

use anyhow::Result;
use sales_catalog::client::CatalogClient;
use sales_catalog::sink::PipeFileSink;
use sales_core::settings::Settings;

use crate::pipeline::Pipeline;

fn main() -> ExitCode {
    let settings = Settings::load();

    // Held until exit so the file appender flushes.
    let _log_guard = match bootstrap::setup_logging(&settings.log_level, settings.log_path()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("❌ Could not initialise logging: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Error in main workflow: {:#}", e);
            eprintln!("❌ An error occurred: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings) -> Result<()> {
    settings.validate()?;

    tracing::info!("Sales Analytics v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(input = %settings.input.display(), catalog = %settings.catalog_url, "settings loaded");

    println!("========================================");
    println!("        SALES ANALYTICS SYSTEM");
    println!("========================================");

    let client = CatalogClient::new(settings.catalog_url.as_str(), settings.catalog_timeout_secs);
    let mut sink = PipeFileSink::new(&settings.enriched_output);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let outcome = Pipeline::new(settings, &client, &mut sink).run(&mut stdin.lock(), &mut stdout.lock())?;

    println!("========================================");
    tracing::info!(
        lines = outcome.lines_read,
        parsed = outcome.parsed,
        kept = outcome.filter_summary.final_count,
        records = outcome.analysis.transaction_count,
        catalog = outcome.catalog_size,
        matched = outcome.enrichment.matched,
        enriched_saved = outcome.enriched_saved,
        report_bytes = outcome.report.len(),
        "run complete"
    );
    Ok(())
}
