use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser};
use http_probe::{ClientOptions, Engine, Hit, Stats};
use liveprobe_core::ProbeConfig;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod input;
mod output;

use input::Source;
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "liveprobe", version, about = "Print the HTTP(S) endpoints that answer, one per line")]
struct Cli {
    /// Max concurrent probes [default: 50]
    #[arg(short = 'c', long)]
    concurrency: Option<usize>,
    /// Additional probe: medium, large, xlarge, or scheme:port. Repeatable.
    #[arg(short = 'p', long = "probe", value_name = "SPEC")]
    probes: Vec<String>,
    /// Skip the default probes (http:80 and https:443)
    #[arg(short = 's', long)]
    skip_default: bool,
    /// Per-probe timeout in seconds [default: 9]
    #[arg(short = 't', long = "timeout", value_name = "SECS")]
    timeout_secs: Option<u64>,
    /// Input file; - reads stdin
    #[arg(short = 'i', long, value_name = "FILE", default_value = "-")]
    input: String,
    /// Take ports from the input line itself (example.com,2087,2086)
    #[arg(short = 'l', long)]
    same_line_ports: bool,
    /// Output format [default: text]
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    /// Optional config file (YAML). If omitted, loads ./liveprobe.yaml if present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log more to stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone)]
struct Settings {
    probe: ProbeConfig,
    format: OutputFormat,
}

fn resolve_settings(cli: &Cli, file: Option<config::Config>) -> Result<Settings> {
    let file = file.unwrap_or_default();
    let defaults = ProbeConfig::default();

    let format = match (cli.format, file.format.as_deref()) {
        (Some(f), _) => f,
        (None, Some(name)) => OutputFormat::from_name(name)
            .ok_or_else(|| anyhow!("unknown output format in config: {}", name))?,
        (None, None) => OutputFormat::Text,
    };

    let tokens = if cli.probes.is_empty() { file.probes.unwrap_or_default() } else { cli.probes.clone() };
    let base = ProbeConfig {
        concurrency: cli.concurrency.or(file.concurrency).unwrap_or(defaults.concurrency),
        timeout: cli.timeout_secs.or(file.timeout_secs).map(Duration::from_secs).unwrap_or(defaults.timeout),
        probes: Vec::new(),
        skip_default: cli.skip_default || file.skip_default.unwrap_or(false),
        same_line_ports: cli.same_line_ports || file.same_line_ports.unwrap_or(false),
    };
    let (probe, rejected) = base.with_probe_tokens(tokens);
    for e in rejected {
        debug!(error = %e, "skipping probe spec");
    }
    Ok(Settings { probe, format })
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cfg: &ProbeConfig, source: &Source, hits: mpsc::UnboundedSender<Hit>) -> Result<Stats> {
    let mut lines = source.open().await?;
    let engine = Engine::from_config(cfg, &ClientOptions::default(), hits)?;

    let mut hosts = 0u64;
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let urls = cfg.candidates(&line);
                if urls.is_empty() {
                    continue;
                }
                hosts += 1;
                for url in urls {
                    engine.submit(url).await;
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "error reading input");
                break;
            }
        }
    }
    debug!(hosts, pending = engine.pending(), "input exhausted");
    engine.await_all().await;
    Ok(engine.stats())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let loaded_cfg = config::load_config(cli.config.as_deref())?;
    let settings = resolve_settings(&cli, loaded_cfg)?;
    let source = Source::from_arg(&cli.input)?;
    debug!(
        core = liveprobe_core::version(),
        concurrency = settings.probe.concurrency,
        timeout_secs = settings.probe.timeout.as_secs(),
        probes = ?settings.probe.probes.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
        "starting"
    );

    let started = Instant::now();
    let (tx, rx) = mpsc::unbounded_channel::<Hit>();
    let writer = output::spawn_stdout_writer(rx, settings.format);

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(run(&settings.probe, &source, tx));
    // Abandoned probes may still be parked in DNS lookups; don't wait on them.
    rt.shutdown_background();

    let written = writer.join().map_err(|_| anyhow!("output writer panicked"))?;
    let stats = result?;
    if written < stats.reachable {
        warn!(written, reachable = stats.reachable, "output closed early");
    }
    info!(
        submitted = stats.submitted,
        reachable = stats.reachable,
        failed = stats.failed,
        timed_out = stats.timed_out,
        duration_ms = started.elapsed().as_millis() as u64,
        "done"
    );
    Ok(())
}
