use crate::query::Query;
use crate::report;
use crate::swing::Swing;

use anyhow::Context;
use rayon::prelude::*;

/// Lists the recordings to search.
///
/// A file path is taken as is. A directory contributes every `.csv` file
/// directly inside it, sorted by name.
///
/// # Arguments
/// * `input` - File or directory path.
///
/// # Returns
/// * `anyhow::Result<Vec<PathBuf>>` - Paths to process, never empty.
pub fn collect_inputs<P: AsRef<std::path::Path>>(input: P) -> anyhow::Result<Vec<std::path::PathBuf>> {
    let input = input.as_ref();
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(anyhow::anyhow!("Input path does not exist: {}", input.display()));
    }

    let mut paths = std::fs::read_dir(input)
        .with_context(|| format!("Failed to read input directory {}", input.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().map_or(false, |ext| ext == "csv"))
        .collect::<Vec<_>>();
    paths.sort();

    if paths.is_empty() {
        return Err(anyhow::anyhow!("No .csv files found in {}", input.display()));
    }
    anyhow::Ok(paths)
}

/// Loads one recording and runs `query` on it.
fn process_file(path: &std::path::Path, query: &Query) -> anyhow::Result<Vec<report::ReportRow>> {
    let swing = Swing::from_path(path).with_context(|| format!("Failed to load {}", path.display()))?;
    let outcome = query
        .run(&swing)
        .with_context(|| format!("Search failed on {}", path.display()))?;
    tracing::debug!(file = %path.display(), ?outcome, "Searched swing");

    Ok(report::rows_for_outcome(
        &display_name(path),
        query.operation,
        &swing,
        query.win_length,
        &outcome,
    ))
}

/// Runs `query` over every path in parallel.
///
/// Recordings are independent, so each file is loaded and searched on
/// whichever rayon worker picks it up. A file that fails is logged and
/// reported as an error row; the remaining files still run. Rows come
/// back in the order of `paths`.
///
/// # Arguments
/// * `paths` - Recordings to search.
/// * `query` - The search to run on each.
///
/// # Returns
/// * `anyhow::Result<Vec<ReportRow>>` - All report rows.
pub fn process_files(paths: &[std::path::PathBuf], query: &Query) -> anyhow::Result<Vec<report::ReportRow>> {
    let progress = indicatif::ProgressBar::new(paths.len() as u64);
    progress.set_style(
        indicatif::ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .map_err(|e| anyhow::anyhow!("Invalid progress template: {}", e))?,
    );

    let rows = paths
        .par_iter()
        .map(|path| {
            let rows = match process_file(path, query) {
                Ok(rows) => rows,
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %format!("{:#}", e), "Skipping swing");
                    vec![report::error_row(&display_name(path), query.operation, &e)]
                }
            };
            progress.inc(1);
            rows
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

    progress.finish_with_message("done");
    anyhow::Ok(rows)
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
