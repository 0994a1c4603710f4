use swing_search::{batch, cli, logging, report};

/// Main entry point of the application.
///
/// 1. Parses command-line arguments and initializes logging.
/// 2. Determines the number of threads to use.
/// 3. Runs the search over every input recording.
/// 4. Writes the CSV report to the output file or stdout.
fn main() -> anyhow::Result<()> {
    let total_start = std::time::Instant::now();
    let args = cli::Args::parse()?;
    logging::init_logging(&args.logging);

    let paths = batch::collect_inputs(&args.input)?;
    tracing::info!(files = paths.len(), operation = args.query.operation.name(), "Start searching");

    let rows = match args.threads {
        Some(n) => {
            let max_threads = num_cpus::get();
            let n = if n > max_threads {
                tracing::warn!("Limiting thread count to {} (max available)", max_threads);
                max_threads
            } else {
                n
            };
            tracing::info!("Using {} thread(s)", n);
            let local_pool = configure_thread_pool(n)?;
            local_pool.install(|| batch::process_files(&paths, &args.query))?
        }
        None => {
            tracing::info!("Using {} thread(s)", rayon::current_num_threads());
            batch::process_files(&paths, &args.query)?
        }
    };

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            report::write_report(std::fs::File::create(path)?, &rows)?;
        }
        None => report::write_report(std::io::stdout().lock(), &rows)?,
    }

    tracing::info!(
        rows = rows.len(),
        seconds = total_start.elapsed().as_secs_f64(),
        "Search completed"
    );
    Ok(())
}

/// Configures a custom Rayon thread pool with specified size.
///
/// # Arguments
/// * `num_threads` - Desired number of threads for the pool.
///
/// # Returns
/// * `Result<ThreadPool>` - Created thread pool or an error if creation fails.
fn configure_thread_pool(num_threads: usize) -> anyhow::Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build thread pool: {}", e))
}
