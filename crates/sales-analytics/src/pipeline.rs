//! The ten-step run: read, parse, filter, analyze, enrich, report.

use std::io::{BufRead, Write};

use anyhow::Context;
use sales_catalog::client::ProductSource;
use sales_catalog::enrich::{
    align_product_ids, create_product_mapping, enrich_sales_data, EnrichmentSummary, DEFAULT_CATALOG_SIZE,
};
use sales_catalog::sink::EnrichedSink;
use sales_core::models::FilterSummary;
use sales_core::settings::Settings;
use sales_data::aggregator::SalesAnalysis;
use sales_data::parser::parse_transactions;
use sales_data::reader::read_sales_data;
use sales_data::validator::{filter_hints, validate_and_filter};
use sales_report::report::{generated_timestamp, render_report, write_report, ReportOptions};
use tracing::{debug, info, warn};

use crate::prompt;

const TOTAL_STEPS: usize = 10;

/// What a finished run produced.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub lines_read: usize,
    pub parsed: usize,
    pub filter_summary: FilterSummary,
    pub analysis: SalesAnalysis,
    pub catalog_size: usize,
    pub enrichment: EnrichmentSummary,
    /// `false` when the enriched file could not be written.
    pub enriched_saved: bool,
    pub report: String,
}

/// Drives one run against injected collaborators.
pub struct Pipeline<'a> {
    settings: &'a Settings,
    source: &'a dyn ProductSource,
    sink: &'a mut dyn EnrichedSink,
}

impl<'a> Pipeline<'a> {
    pub fn new(settings: &'a Settings, source: &'a dyn ProductSource, sink: &'a mut dyn EnrichedSink) -> Self {
        Self { settings, source, sink }
    }

    /// Run every step, writing progress to `out`.
    ///
    /// `input` is only read when the settings ask for the interactive prompt.
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> anyhow::Result<PipelineOutcome> {
        let settings = self.settings;

        step(out, 1, "Reading sales data...")?;
        let lines = read_sales_data(&settings.input);
        writeln!(out, "✓ Successfully read {} transactions", lines.len())?;

        step(out, 2, "Parsing and cleaning data...")?;
        let transactions = parse_transactions(&lines);
        writeln!(out, "✓ Parsed {} records", transactions.len())?;

        step(out, 3, "Filter Options Available:")?;
        prompt::show_hints(out, &filter_hints(&transactions), &settings.currency_symbol)?;
        let mut filters = settings.filter_options();
        if settings.interactive {
            if let Some(chosen) = prompt::prompt_filters(input, out)? {
                filters = chosen;
            }
        }
        debug!(?filters, "filters in effect");

        step(out, 4, "Validating transactions...")?;
        let (valid, invalid, filter_summary) = validate_and_filter(&transactions, &filters);
        info!(
            total = filter_summary.total_input,
            invalid,
            by_region = filter_summary.filtered_by_region,
            by_amount = filter_summary.filtered_by_amount,
            kept = filter_summary.final_count,
            "validation complete"
        );
        writeln!(out, "✓ Valid: {} | Invalid: {}", filter_summary.final_count, invalid)?;

        step(out, 5, "Analyzing sales data...")?;
        let analysis = SalesAnalysis::compute(&valid, settings.top_n, settings.low_threshold);
        writeln!(out, "✓ Analysis complete")?;

        step(out, 6, "Fetching product data from API...")?;
        let products = if settings.offline {
            info!("offline mode; skipping catalog fetch");
            Vec::new()
        } else {
            self.source.fetch_products()
        };
        let mapping = create_product_mapping(&products);
        writeln!(out, "✓ Fetched {} products", products.len())?;

        step(out, 7, "Enriching sales data...")?;
        let enriched = if settings.align_ids {
            let aligned = align_product_ids(&valid, DEFAULT_CATALOG_SIZE);
            enrich_sales_data(&aligned, &mapping)
        } else {
            enrich_sales_data(&valid, &mapping)
        };
        let enrichment = EnrichmentSummary::from_records(&enriched);
        writeln!(
            out,
            "✓ Enriched {}/{} transactions ({:.1}%)",
            enrichment.matched,
            enrichment.total,
            enrichment.success_rate()
        )?;

        step(out, 8, "Saving enriched data...")?;
        let enriched_saved = match self.sink.write_records(&enriched) {
            Ok(()) => {
                writeln!(out, "✓ Saved to: {}", settings.enriched_output.display())?;
                true
            }
            Err(e) => {
                warn!(error = %e, "could not save enriched data; continuing");
                writeln!(out, "✗ Could not save enriched data: {}", e)?;
                false
            }
        };

        step(out, 9, "Generating report...")?;
        let options = ReportOptions {
            top_n: settings.top_n,
            currency_symbol: settings.currency_symbol.clone(),
        };
        let report = render_report(&analysis, &enrichment, &options, &generated_timestamp());
        write_report(&settings.report_output, &report).context("failed to save the sales report")?;
        writeln!(out, "✓ Report saved to: {}", settings.report_output.display())?;

        step(out, 10, "Process Complete!")?;

        Ok(PipelineOutcome {
            lines_read: lines.len(),
            parsed: transactions.len(),
            filter_summary,
            analysis,
            catalog_size: products.len(),
            enrichment,
            enriched_saved,
            report,
        })
    }
}

fn step<W: Write>(out: &mut W, n: usize, label: &str) -> std::io::Result<()> {
    info!("Step {}: {}", n, label.trim_end_matches(['.', ':']));
    writeln!(out, "\n[{}/{}] {}", n, TOTAL_STEPS, label)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
