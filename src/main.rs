use clap::Parser;
use colored::Colorize;
use ip_range_check::config::Cli;
use ip_range_check::{firehol, init_logging, run};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    log::info!("#Start main()");

    if let Some(dir) = &cli.download {
        let report = firehol::download(dir, cli.force_download)?;
        println!(
            "{} {} sets, {} ranges, {} IPs ({} dupes) -> {}",
            "FireHOL:".bold(),
            report.sets,
            report.ranges,
            report.ips,
            report.dupes,
            firehol::merged_file_path(dir).display()
        );
        return Ok(());
    }

    run(&cli).await?;
    Ok(())
}
