// cargo watch -x 'fmt' -x 'run'  // 'run -- -i access.log'

pub mod config;
pub mod error;
pub mod firehol;
pub mod index;
pub mod models;
pub mod output;
pub mod processing;
pub mod sources;

use config::Cli;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use processing::{MatchingEngine, RunSummary};
use std::error::Error;
use std::path::Path;

pub const LOG_CONFIG_FILE: &str = "log4rs.yml";

fn console_config(level: LevelFilter) -> Result<Config, Box<dyn Error>> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {M} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))?;
    Ok(config)
}

/// Set up log4rs from `log4rs.yml`, or a console logger when the file is
/// missing. `verbose` always uses the console logger at debug level.
pub fn init_logging(verbose: bool) -> Result<(), Box<dyn Error>> {
    if !verbose && Path::new(LOG_CONFIG_FILE).is_file() {
        log4rs::init_file(LOG_CONFIG_FILE, Default::default())
            .map_err(|e| format!("Error initializing log4rs from {LOG_CONFIG_FILE}: {e}"))?;
        return Ok(());
    }
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    log4rs::init_config(console_config(level)?)?;
    Ok(())
}

/// Load the range CSV at `path` into the engine. Bad records are logged and
/// skipped.
pub fn load_ranges(engine: &mut MatchingEngine, path: &Path) -> Result<usize, Box<dyn Error>> {
    let records = sources::for_each_csv_record(path, |n, record| {
        if let Err(e) = engine.load_range_record(n, record) {
            log::warn!("skipping range record #{n} in {}: {e}", path.display());
        }
        Ok(())
    })?;
    log::info!(
        "Loaded {} ranges from {} ({records} records)",
        engine.ranges().len(),
        path.display()
    );
    Ok(records)
}

/// Load a merged FireHOL blocklist into the engine.
pub fn load_blocklist(engine: &mut MatchingEngine, path: &Path) -> Result<usize, Box<dyn Error>> {
    let lines = sources::for_each_line(path, |n, line| {
        if let Err(e) = engine.load_blocklist_line(line) {
            log::warn!("skipping blocklist line #{n} in {}: {e}", path.display());
        }
        Ok(())
    })?;
    log::info!(
        "Loaded {} flagged IPs from {} sources in {}",
        engine.exact().len(),
        engine.exact().source_count(),
        path.display()
    );
    Ok(lines)
}

/// Check every line of `path`, printing each match as it is found.
///
/// Returns the matches in scan order.
pub fn scan_file(
    engine: &mut MatchingEngine,
    path: &Path,
    print_lines: bool,
) -> Result<Vec<models::MatchRecord>, Box<dyn Error>> {
    let mut found = Vec::new();
    sources::for_each_line(path, |_, line| {
        for record in engine.scan_line(line) {
            let display = if print_lines { line } else { record.ip.as_str() };
            output::print_match(display, &record);
            let times = engine.times_reported(&record.ip);
            if times > 1 {
                log::debug!("{} reported {times} times", record.ip);
            }
            found.push(record);
        }
        Ok(())
    })?;
    Ok(found)
}

/// Build the index from the configured sources, scan the input and write
/// the requested outputs.
pub async fn run(cli: &Cli) -> Result<RunSummary, Box<dyn Error>> {
    let input = cli
        .input_file
        .as_deref()
        .ok_or("No input given, use --input-file (or --download to fetch FireHOL lists)")?;

    let mut engine = MatchingEngine::new(cli.engine_options());

    let ranges = sources::resolve(&cli.ip_ranges).await?;
    if ranges.is_download() {
        log::debug!("Range CSV {} cached at {}", cli.ip_ranges, ranges.path().display());
    }
    load_ranges(&mut engine, ranges.path())?;

    if let Some(firehol_file) = &cli.firehol_file {
        load_blocklist(&mut engine, firehol_file)?;
    }

    let input = sources::resolve(input).await?;
    if input.is_download() {
        log::info!("Scanning downloaded input {} ..", input.path().display());
    } else {
        log::info!("Scanning {} ..", input.path().display());
    }
    let found = scan_file(&mut engine, input.path(), cli.print_lines)?;

    let summary = engine.summary();
    output::print_summary(&summary);

    for (ip, infos) in engine.duplicates() {
        log::debug!("{ip} reported {} times: {}", infos.len(), infos.join(", "));
    }

    if let Some(csv_file) = &cli.to_csv_file {
        output::write_matches_csv(csv_file, &found)?;
    }
    if let Some(json_file) = &cli.summary_json {
        output::write_summary_json(json_file, &summary)?;
    }

    Ok(summary)
}
