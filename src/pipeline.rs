//! File-backed stages. Each one reads its input tables, applies one
//! transform and writes the result, closing every file before it returns.

use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::{DataPaths, ScrapeConfig};
use crate::enrich::process_rows;
use crate::error::{ScrapeError, TableError};
use crate::extract::PageSelectors;
use crate::fetch::HttpFetcher;
use crate::pager::Pager;
use crate::reconcile::{fill, normalize_levels, reconcile, split_repeated};
use crate::record::ExerciseRecord;
use crate::schema::{ENRICHMENT_COLUMNS, EXERCISE, MUSCLE_GROUP, NAME_INDEX};
use crate::table::Table;

/// Crawl every listing page reachable from `config.base_url`.
pub async fn scrape(config: &ScrapeConfig) -> Result<Vec<ExerciseRecord>, ScrapeError> {
    let fetcher = HttpFetcher::new(config)?;
    let selectors = PageSelectors::new()?;
    Pager::new(&fetcher, &selectors, config)
        .scrape_all(&config.base_url)
        .await
}

/// Serialize records as CSV with the `exercises.csv` header.
pub fn write_records<W: io::Write>(records: &[ExerciseRecord], writer: W) -> Result<(), TableError> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_records(records: &[ExerciseRecord], path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_records(records, file).with_context(|| format!("writing {}", path.display()))?;
    log::info!("💾 Saved {} entries to {}", records.len(), path.display());
    Ok(())
}

/// Save records as CSV and produce the requested extra rendering.
///
/// With the `csv` format the table goes to `output`, or to
/// `paths.exercises` when no output is given. Any other format still saves
/// `paths.exercises`, then writes its rendering to `output` or returns it
/// for printing.
pub fn emit_records(
    records: &[ExerciseRecord],
    paths: &DataPaths,
    format: &str,
    output: Option<&Path>,
) -> Result<Option<String>> {
    if format.eq_ignore_ascii_case("csv") {
        save_records(records, output.unwrap_or(paths.exercises.as_path()))?;
        return Ok(None);
    }

    let rendered = render(records, format)?;
    save_records(records, &paths.exercises)?;
    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("writing {}", path.display()))?;
            log::info!("💾 Output saved to: {}", path.display());
            Ok(None)
        }
        None => Ok(Some(rendered)),
    }
}

/// Render records as `json`, `csv` or `text`.
pub fn render(records: &[ExerciseRecord], format: &str) -> Result<String> {
    match format.to_lowercase().as_str() {
        "json" => format_json(records),
        "csv" => format_csv(records),
        "text" | "txt" => Ok(format_text(records)),
        other => {
            log::error!("Unknown format: {}", other);
            Err(anyhow::anyhow!(
                "Unknown format '{}'. Use: json, csv, or text",
                other
            ))
        }
    }
}

fn format_json(records: &[ExerciseRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

fn format_csv(records: &[ExerciseRecord]) -> Result<String> {
    let mut out = Vec::new();
    write_records(records, &mut out)?;
    Ok(String::from_utf8(out)?)
}

fn format_text(records: &[ExerciseRecord]) -> String {
    let mut output = format!("Total scraped {} entries from all pages.\n", records.len());
    for record in records {
        output.push_str(&format!(
            "Exercise: {}, Primary Muscle: {}, Link: {}, Image: {}\n",
            record.name, record.primary_muscle, record.detail_link, record.image_link
        ));
    }
    output
}

/// Hints logged when a crawl comes back empty.
pub fn log_empty_scrape_hints(config: &ScrapeConfig) {
    log::warn!("No exercises scraped. Check the troubleshooting steps:");
    log::warn!("1. Verify the base URL: {}", config.base_url);
    log::warn!("2. Check for JavaScript: dynamically rendered listings are not supported.");
    log::warn!("3. Check the listing markup: entries are expected under <section class='exercise_list'>.");
}

/// Split `exercises` into `unique` (first row per name) and `repeated`.
/// Returns the (unique, repeated) row counts.
pub fn filter_stage(paths: &DataPaths) -> Result<(usize, usize)> {
    let source = read(&paths.exercises)?;
    let split = split_repeated(&source, NAME_INDEX);

    write(&split.unique, &paths.unique)?;
    write(&split.repeated, &paths.repeated)?;
    log::info!("Unique exercises saved to: {}", paths.unique.display());
    log::info!("Repeated exercises saved to: {}", paths.repeated.display());

    Ok((split.unique.len(), split.repeated.len()))
}

/// Merge `repeated` over `unique` into `consolidated`, keeping the
/// repeated rows' muscle group.
pub fn consolidate_stage(paths: &DataPaths) -> Result<usize> {
    let unique = read(&paths.unique)?;
    let repeated = read(&paths.repeated)?;

    let merged = reconcile(&repeated, &unique, EXERCISE, MUSCLE_GROUP)
        .context("reconciling repeated exercises")?;
    write(&merged, &paths.consolidated)?;
    log::info!("Consolidated file saved to: {}", paths.consolidated.display());

    Ok(merged.len())
}

/// Fill the exercise list's enrichment columns from `consolidated` and
/// normalize the level columns.
pub fn fill_stage(paths: &DataPaths) -> Result<usize> {
    let list = read(&paths.exercise_list)?;
    let consolidated = read(&paths.consolidated)?;

    let filled = fill(&list, &consolidated, MUSCLE_GROUP, EXERCISE, &ENRICHMENT_COLUMNS)
        .context("filling exercise list")?;
    let normalized = normalize_levels(&filled);
    write(&normalized, &paths.filled)?;
    log::info!("Filled exercise list saved to: {}", paths.filled.display());

    Ok(normalized.len())
}

/// Append inferred attributes to every short row of `exercises`.
/// Returns the number of rows completed.
pub fn process_stage(paths: &DataPaths, batch_size: usize) -> Result<usize> {
    let input = File::open(&paths.exercises)
        .with_context(|| format!("opening {}", paths.exercises.display()))?;
    let output = File::create(&paths.processed)
        .with_context(|| format!("creating {}", paths.processed.display()))?;

    let completed = process_rows(input, output, batch_size)
        .with_context(|| format!("processing {}", paths.exercises.display()))?;
    log::info!(
        "Inferred attributes for {} rows, saved to: {}",
        completed,
        paths.processed.display()
    );

    Ok(completed)
}

fn read(path: &Path) -> Result<Table> {
    Table::read_path(path).with_context(|| format!("reading {}", path.display()))
}

fn write(table: &Table, path: &Path) -> Result<()> {
    table
        .write_path(path)
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::schema::SCRAPED_COLUMNS;

    fn records() -> Vec<ExerciseRecord> {
        vec![ExerciseRecord {
            name: "Barbell Row".to_string(),
            primary_muscle: "Lats".to_string(),
            detail_link: "https://site.test/row/".to_string(),
            image_link: "Not available".to_string(),
        }]
    }

    #[test]
    fn csv_header_matches_scraped_schema() {
        let csv = render(&records(), "csv").unwrap();
        let header = csv.lines().next().unwrap();
        assert_eq!(header, SCRAPED_COLUMNS.join(","));
        assert_eq!(
            csv.lines().nth(1).unwrap(),
            "Barbell Row,Lats,https://site.test/row/,Not available"
        );
    }

    #[test]
    fn json_uses_csv_field_names() {
        let json = render(&records(), "JSON").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["exercise"], "Barbell Row");
        assert_eq!(value[0]["exercise_link"], "https://site.test/row/");
    }

    #[test]
    fn text_lists_every_record() {
        let text = render(&records(), "text").unwrap();
        assert!(text.starts_with("Total scraped 1 entries"));
        assert!(text.contains("Exercise: Barbell Row, Primary Muscle: Lats"));
    }

    #[test]
    fn text_format_still_saves_csv() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::in_dir(dir.path());

        let printed = emit_records(&records(), &paths, "text", None).unwrap();

        assert!(printed.unwrap().contains("Exercise: Barbell Row"));
        let saved = std::fs::read_to_string(&paths.exercises).unwrap();
        assert_eq!(saved.lines().next().unwrap(), SCRAPED_COLUMNS.join(","));
        assert_eq!(saved.lines().count(), 2);
    }

    #[test]
    fn json_output_goes_next_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::in_dir(dir.path());
        let json_path = dir.path().join("exercises.json");

        let printed = emit_records(&records(), &paths, "json", Some(&json_path)).unwrap();

        assert_eq!(printed, None);
        assert!(paths.exercises.exists());
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value[0]["primary_muscle"], "Lats");
    }

    #[test]
    fn csv_output_replaces_default_path() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::in_dir(dir.path());
        let custom = dir.path().join("custom.csv");

        assert_eq!(emit_records(&records(), &paths, "CSV", Some(&custom)).unwrap(), None);

        assert!(custom.exists());
        assert!(!paths.exercises.exists());
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(render(&records(), "xml").is_err());
    }
}
