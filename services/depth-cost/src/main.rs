//! depth-cost command line
//!
//! Runs batch feeds through the checksum engine, writes synthetic feeds and
//! compares scan strategies against each other.

#![allow(clippy::print_stdout)] // Checksum goes to stdout for scripting
#![allow(clippy::cast_precision_loss)] // Throughput figures
#![allow(clippy::cast_possible_truncation)] // Elapsed millis

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use depth_cost::{ServiceSettings, SynthConfig, generate, run_feed, save_batches};
use lob::{LatencyStats, RunConfig, ScanStrategy, run_with};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "depth-cost", about = "Book merge and market-buy cost checksums")]
struct Cli {
    /// Settings file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log filter; overrides the settings file
    #[arg(long, global = true)]
    log: Option<String>,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Fold a JSON batch feed into a checksum and print it
    Run {
        #[arg(long)]
        input: PathBuf,
        /// scalar, chunked or simd
        #[arg(long, value_parser = parse_scan)]
        scan: Option<ScanStrategy>,
        /// Skip per-batch capacity checks; only for feeds known to fit the book
        #[arg(long)]
        trusted: bool,
        /// Record merge and scan latency
        #[arg(long)]
        profile: bool,
    },
    /// Write a synthetic batch feed
    Generate {
        #[arg(long)]
        output: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        batches: Option<usize>,
    },
    /// Run every scan strategy over one synthetic feed and compare
    Bench {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        batches: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = ServiceSettings::load(cli.config.as_deref()).context("loading settings")?;

    let filter = cli.log.unwrap_or_else(|| settings.log.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .compact()
        .init();

    match cli.cmd {
        Cmd::Run {
            input,
            scan,
            trusted,
            profile,
        } => {
            let mut engine = settings.engine;
            if let Some(scan) = scan {
                engine.scan = scan;
            }
            engine.track_latency |= profile;
            cmd_run(input, engine, trusted)
        }
        Cmd::Generate {
            output,
            seed,
            batches,
        } => cmd_generate(output, synth_config(settings.generator, seed, batches)),
        Cmd::Bench { seed, batches } => cmd_bench(synth_config(settings.generator, seed, batches)),
    }
}

fn parse_scan(name: &str) -> Result<ScanStrategy, String> {
    ScanStrategy::ALL
        .into_iter()
        .find(|s| s.to_string().eq_ignore_ascii_case(name))
        .ok_or_else(|| format!("unknown scan strategy '{name}', expected scalar, chunked or simd"))
}

fn synth_config(base: SynthConfig, seed: Option<u64>, batches: Option<usize>) -> SynthConfig {
    let config = match seed {
        Some(seed) => base.with_seed(seed),
        None => base,
    };
    match batches {
        Some(batches) => config.with_batches(batches),
        None => config,
    }
}

fn cmd_run(input: PathBuf, engine: RunConfig, trusted: bool) -> Result<()> {
    let scan = engine.scan;
    let t0 = Instant::now();
    let (result, metrics) =
        run_feed(&input, engine, trusted).with_context(|| format!("running {}", input.display()))?;
    let elapsed = t0.elapsed();

    let snap = metrics.snapshot();
    info!(
        batches = result.batches,
        partial_fills = result.partial_fills,
        max_depth = snap.max_depth,
        scan = %scan,
        trusted,
        elapsed_ms = elapsed.as_millis() as u64,
        "run complete"
    );
    if let Some(stats) = snap.merge_latency {
        print_latency("merge", &stats);
    }
    if let Some(stats) = snap.scan_latency {
        print_latency("scan", &stats);
    }

    println!("{result}");
    Ok(())
}

fn cmd_generate(output: PathBuf, config: SynthConfig) -> Result<()> {
    let batches = generate(&config);
    save_batches(&output, &batches).with_context(|| format!("writing {}", output.display()))?;
    info!(
        path = %output.display(),
        batches = batches.len(),
        seed = config.seed,
        "feed written"
    );
    Ok(())
}

fn cmd_bench(config: SynthConfig) -> Result<()> {
    let batches = generate(&config);
    info!(batches = batches.len(), seed = config.seed, "benchmarking scan strategies");

    let mut reference = None;
    for scan in ScanStrategy::ALL {
        let engine = RunConfig {
            scan,
            ..RunConfig::profiled()
        };
        let t0 = Instant::now();
        let (result, metrics) = run_with(engine, &batches)?;
        let secs = t0.elapsed().as_secs_f64();

        let rate = if secs > 0.0 { batches.len() as f64 / secs } else { 0.0 };
        info!("{}: checksum={} {:.0} batches/s", scan, result.checksum, rate);
        let snap = metrics.snapshot();
        if let Some(stats) = snap.scan_latency {
            print_latency(&format!("{scan} scan"), &stats);
        }

        match reference {
            None => reference = Some(result.checksum),
            Some(expected) if expected != result.checksum => {
                warn!(%scan, expected, got = result.checksum, "checksum mismatch");
                bail!("{scan} produced checksum {} but expected {expected}", result.checksum);
            }
            Some(_) => {}
        }
    }

    if let Some(checksum) = reference {
        println!("{checksum}");
    }
    Ok(())
}

fn print_latency(name: &str, stats: &LatencyStats) {
    info!(
        "{}: n={} p50={}ns p90={}ns p99={}ns p99.9={}ns max={}ns",
        name, stats.count, stats.p50, stats.p90, stats.p99, stats.p999, stats.max
    );
}
