use serde::{Deserialize, Serialize};
use std::{
    convert::TryFrom,
    fmt,
    io::{self, Write},
    str::FromStr,
};

use crate::error::FetchError;

/// Stream that receives diagnostic tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticStream {
    /// Keeps errors out of a bar that shows raw stdout.
    #[default]
    Stderr,
    Stdout,
}

impl DiagnosticStream {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticStream::Stderr => "stderr",
            DiagnosticStream::Stdout => "stdout",
        }
    }

    pub const fn all() -> &'static [DiagnosticStream] {
        &[DiagnosticStream::Stderr, DiagnosticStream::Stdout]
    }
}

impl fmt::Display for DiagnosticStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DiagnosticStream {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "stderr" => Ok(DiagnosticStream::Stderr),
            "stdout" => Ok(DiagnosticStream::Stdout),
            _ => Err(anyhow::anyhow!(
                "Unknown diagnostic stream '{value}'. Supported streams: stderr, stdout."
            )),
        }
    }
}

impl FromStr for DiagnosticStream {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiagnosticStream::try_from(s)
    }
}

/// Write the outcome of one run: the weather line to `out`, or the
/// diagnostic token to the configured stream.
pub fn report<O: Write, E: Write>(
    outcome: &Result<String, FetchError>,
    diagnostics: DiagnosticStream,
    out: &mut O,
    err: &mut E,
) -> io::Result<()> {
    match outcome {
        Ok(line) => writeln!(out, "{line}"),
        Err(e) => {
            log::warn!("{e}");
            match diagnostics {
                DiagnosticStream::Stderr => writeln!(err, "{}", e.token()),
                DiagnosticStream::Stdout => writeln!(out, "{}", e.token()),
            }
        }
    }
}
