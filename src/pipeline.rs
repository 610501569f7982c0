use crate::error::Result;
use crate::output::OutputWriter;
use crate::types::{NormalizedRecord, Query, SourceClient};
use crate::validator::validate;
use metrics::{counter, histogram};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, instrument};

/// Summary of one workflow run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub source: String,
    pub query: String,
    /// Records produced by the parse stage
    pub found: usize,
    /// Records that passed validation and were written
    pub kept: usize,
    pub dropped: usize,
    /// `None` when nothing survived validation
    pub output_file: Option<PathBuf>,
}

/// fetch -> parse -> validate -> persist, for any [`SourceClient`].
pub struct Pipeline;

impl Pipeline {
    /// Keep only records that pass validation, preserving order.
    pub fn validate_batch(records: Vec<NormalizedRecord>) -> Vec<NormalizedRecord> {
        records.into_iter().filter(validate).collect()
    }

    /// Run the complete workflow for one query and write exactly one output artifact.
    ///
    /// Per-page and per-item failures are absorbed by the client; only output I/O errors
    /// come back from here.
    #[instrument(skip(client, query, writer), fields(source = %client.source_name(), query = %query))]
    pub async fn run(client: &dyn SourceClient, query: &Query, writer: &OutputWriter) -> Result<PipelineResult> {
        let source = client.source_name().to_string();
        info!("Starting scrape");
        counter!("restaurant_scraper_runs_total", "source" => source.clone()).increment(1);
        let started = Instant::now();

        // Step 1: Fetch raw search results
        let raw = client.fetch_data(query).await;
        info!("Fetched {} raw search results", raw.len());

        // Step 2: Parse into normalized records
        let parsed = client.parse_data(raw).await;
        let found = parsed.len();

        // Step 3: Validate
        let kept_records = Self::validate_batch(parsed);
        let kept = kept_records.len();
        let dropped = found - kept;

        counter!("restaurant_scraper_records_found_total", "source" => source.clone()).increment(found as u64);
        counter!("restaurant_scraper_records_kept_total", "source" => source.clone()).increment(kept as u64);
        counter!("restaurant_scraper_records_dropped_total", "source" => source.clone()).increment(dropped as u64);

        // Step 4: Persist
        let output_file = writer.write(&kept_records, query, client.columns())?;

        histogram!("restaurant_scraper_run_duration_seconds", "source" => source.clone())
            .record(started.elapsed().as_secs_f64());
        info!("Scrape finished: {} found, {} kept, {} dropped", found, kept, dropped);

        Ok(PipelineResult {
            source,
            query: query.to_string(),
            found,
            kept,
            dropped,
            output_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, address: &str) -> NormalizedRecord {
        NormalizedRecord {
            name: Some(name.to_string()).filter(|s| !s.is_empty()),
            address: Some(address.to_string()).filter(|s| !s.is_empty()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_batch_preserves_order_and_drops_invalid() {
        let batch = vec![
            record("A", "a st"),
            record("", "b st"),
            record("C", "c st"),
            record("D", ""),
            record("E", "e st"),
        ];
        let kept = Pipeline::validate_batch(batch);
        let names: Vec<&str> = kept.iter().map(|r| r.display_name()).collect();
        assert_eq!(names, vec!["A", "C", "E"]);
    }
}
