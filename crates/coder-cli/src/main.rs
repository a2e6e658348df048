use anyhow::{Context, Result};
use coder_cli::{build_cli, job_from_args, render_json, render_text, JobFile};
use coder_php::Runner;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    init_tracing(matches.get_count("verbose"));

    let mut dry_run = matches.get_flag("dry-run");
    let json = matches.get_flag("json");

    let jobs = match matches.subcommand() {
        Some(("batch", args)) => {
            let path = args.get_one::<std::path::PathBuf>("jobs").context("missing job file")?;
            let file = JobFile::load(path).await?;
            dry_run |= file.dry_run;
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            file.to_jobs(base)?
        }
        Some((name, args)) => vec![job_from_args(name, args)?],
        None => Vec::new(),
    };
    tracing::info!("Running {} jobs (dry run: {})", jobs.len(), dry_run);

    let report = Runner::new().dry_run(dry_run).run_batch(jobs).await;
    if json {
        println!("{}", render_json(&report, dry_run)?);
    } else {
        print!("{}", render_text(&report, dry_run));
    }

    std::process::exit(if report.is_success() { 0 } else { 1 });
}
