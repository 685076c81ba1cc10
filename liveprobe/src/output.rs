use clap::ValueEnum;
use http_probe::Hit;
use std::io::{self, Write};
use std::thread::JoinHandle;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio::sync::mpsc;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat { Text, Jsonl }

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<OutputFormat> {
        match name {
            "text" => Some(OutputFormat::Text),
            "jsonl" => Some(OutputFormat::Jsonl),
            _ => None,
        }
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| String::new())
}

pub fn render(hit: &Hit, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => hit.url.clone(),
        OutputFormat::Jsonl => serde_json::json!({
            "url": hit.url,
            "status": hit.status,
            "elapsed_ms": hit.elapsed.as_millis() as u64,
            "found_at": now_rfc3339(),
        })
        .to_string(),
    }
}

/// Serialize hits onto `out`, one whole line at a time, until every sender is gone
/// or the sink stops accepting writes.
pub fn write_hits<W: Write>(mut rx: mpsc::UnboundedReceiver<Hit>, format: OutputFormat, mut out: W) -> u64 {
    let mut written = 0;
    while let Some(hit) = rx.blocking_recv() {
        let line = render(&hit, format);
        if writeln!(out, "{}", line).and_then(|_| out.flush()).is_err() {
            break;
        }
        written += 1;
    }
    written
}

/// Writer thread for stdout.
pub fn spawn_stdout_writer(rx: mpsc::UnboundedReceiver<Hit>, format: OutputFormat) -> JoinHandle<u64> {
    std::thread::spawn(move || write_hits(rx, format, io::stdout().lock()))
}
