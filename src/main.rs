mod ats;
mod careers;
mod db;
mod domain;
mod export;
mod fetcher;
mod html;
mod input;
mod jobs;
mod pipeline;
mod settings;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::fetcher::HttpFetcher;
use crate::pipeline::{CompanyPipeline, CompanyResult};
use crate::settings::Settings;

#[derive(Parser)]
#[command(
    name = "careers_scout",
    about = "Guess company websites, careers pages, ATS providers and open roles"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a batch of companies from an input file and store the results
    Run {
        /// CSV with a "Company Name" column, or a text file with one name per line
        #[arg(short, long)]
        input: PathBuf,
        /// Index of the first company in the batch
        #[arg(long, default_value = "0")]
        start: usize,
        /// Companies per batch (default: batch_count setting)
        #[arg(short = 'n', long)]
        count: Option<usize>,
        /// Pause between companies in milliseconds (default: delay_ms setting)
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Also append this batch to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Process a single company and print the result as JSON
    One {
        name: String,
    },
    /// Show stored result statistics
    Stats,
    /// Write every stored result to a CSV file
    Export {
        #[arg(short, long)]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    let result = match cli.command {
        Commands::Run {
            input,
            start,
            count,
            delay_ms,
            csv,
        } => {
            let names = input::load_names(&input)?;
            let batch = input::select_batch(&names, start, count.unwrap_or(settings.batch_count));
            if batch.is_empty() {
                println!("No companies in range (start {}, {} loaded).", start, names.len());
                return Ok(());
            }

            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let run_id = chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string();

            let pipeline = build_pipeline(&settings)?;
            let delay = Duration::from_millis(delay_ms.unwrap_or(settings.delay_ms));
            println!("Processing {} companies (from #{})...", batch.len(), start);
            let results = run_batch(&conn, &run_id, &pipeline, batch, delay).await?;
            info!(run_id = %run_id, stored = results.len(), "results stored");

            if let Some(path) = csv {
                let total = export::write_csv(&path, &results, true)?;
                println!("Appended {} rows to {:?} ({} total)", results.len(), path, total);
            }

            print_summary(&results);
            Ok(())
        }
        Commands::One { name } => {
            let pipeline = build_pipeline(&settings)?;
            let r = pipeline.process(&name).await;
            println!("{}", serde_json::to_string_pretty(&r)?);
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Results:   {}", s.total);
            println!("Runs:      {}", s.runs);
            println!("Website:   {}", s.with_website);
            println!("Careers:   {}", s.with_careers);
            println!("With jobs: {}", s.with_jobs);
            if !s.providers.is_empty() {
                println!("\n--- Providers ---");
                for (provider, n) in &s.providers {
                    println!("  {:<14} {:>6}", provider, n);
                }
            }
            Ok(())
        }
        Commands::Export { out } => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let results = db::fetch_results(&conn)?;
            let n = export::write_csv(&out, &results, false)?;
            println!("Exported {} rows to {:?}", n, out);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn build_pipeline(settings: &Settings) -> anyhow::Result<CompanyPipeline> {
    let fetcher = HttpFetcher::from_settings(settings)?;
    CompanyPipeline::new(Box::new(fetcher), &settings.heuristics)
}

/// One company at a time, pausing between companies (not after the last).
/// Each result is saved as soon as it is produced.
async fn run_batch(
    conn: &rusqlite::Connection,
    run_id: &str,
    pipeline: &CompanyPipeline,
    names: &[String],
    delay: Duration,
) -> anyhow::Result<Vec<CompanyResult>> {
    let pb = ProgressBar::new(names.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let mut results = Vec::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        pb.set_message(name.clone());
        let result = pipeline.process(name).await;
        db::insert_results(conn, run_id, std::slice::from_ref(&result))?;
        results.push(result);
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(results)
}

fn print_summary(results: &[CompanyResult]) {
    let website = results.iter().filter(|r| !r.website_url.is_empty()).count();
    let careers = results.iter().filter(|r| !r.careers_url.is_empty()).count();
    let jobs: usize = results.iter().map(|r| r.found_jobs()).sum();
    println!(
        "Added {} companies: {} websites, {} careers pages, {} job posts.",
        results.len(),
        website,
        careers,
        jobs
    );
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
