use anyhow::{anyhow, Context, Result};
use std::io;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Where host lines come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    pub fn from_arg(arg: &str) -> Result<Source> {
        match arg {
            "" => Err(anyhow!("no input given; use -i FILE or -i - for stdin")),
            "-" => Ok(Source::Stdin),
            path => Ok(Source::File(PathBuf::from(path))),
        }
    }

    pub async fn open(&self) -> Result<HostLines> {
        let reader: Box<dyn AsyncBufRead + Unpin + Send> = match self {
            Source::Stdin => Box::new(BufReader::new(tokio::io::stdin())),
            Source::File(path) => {
                let f = tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("error opening input file {}", path.display()))?;
                Box::new(BufReader::new(f))
            }
        };
        Ok(HostLines::new(reader))
    }
}

/// Byte-oriented line reader. Invalid UTF-8 is replaced rather than ending the stream,
/// so one junk line never hides the hosts after it.
pub struct HostLines {
    reader: Box<dyn AsyncBufRead + Unpin + Send>,
    buf: Vec<u8>,
}

impl HostLines {
    pub fn new(reader: Box<dyn AsyncBufRead + Unpin + Send>) -> Self {
        HostLines { reader, buf: Vec::with_capacity(256) }
    }

    /// Next line without its terminator, or `None` at end of input.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf).await? == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}
