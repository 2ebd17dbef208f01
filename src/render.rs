//! External PDF renderer integration.

use anyhow::{bail, Context};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

/// External collaborator that turns the substituted HTML into a PDF file at
/// the given path.
pub trait PdfRenderer {
    fn render(&self, html: &str, output: &Path) -> anyhow::Result<()>;
}

/// Renders through the `wkhtmltopdf` command line tool.
///
/// The HTML is streamed to stdin; local file access is enabled so the
/// rewritten `file:` asset URLs resolve. A hang in the tool blocks the
/// calling thread, matching the synchronous contract of [`PdfRenderer`].
pub struct Wkhtmltopdf {
    binary: PathBuf,
}

impl Wkhtmltopdf {
    pub fn with_binary(binary: PathBuf) -> Self {
        Self { binary }
    }

    /// Locate the wkhtmltopdf binary in well-known locations or on PATH.
    pub fn discover() -> Option<Self> {
        find_binary().map(|binary| Self { binary })
    }
}

impl PdfRenderer for Wkhtmltopdf {
    fn render(&self, html: &str, output: &Path) -> anyhow::Result<()> {
        let mut child = Command::new(&self.binary)
            .arg("--quiet")
            .arg("--enable-local-file-access")
            .arg("-")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to launch {}", self.binary.display()))?;

        // Write stdin from a separate thread while wait_with_output drains
        // stderr, otherwise a child flooding stderr mid-stream fills the pipe
        // and deadlocks against the blocked stdin write.
        let mut stdin = child
            .stdin
            .take()
            .context("wkhtmltopdf stdin unavailable")?;
        let input = html.to_owned();
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let result = child
            .wait_with_output()
            .context("wkhtmltopdf did not exit cleanly")?;
        let written = writer
            .join()
            .map_err(|_| anyhow::anyhow!("wkhtmltopdf stdin writer panicked"))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            bail!(
                "wkhtmltopdf exited with {}: {}",
                result.status,
                stderr.trim()
            );
        }
        written.context("failed to stream html to wkhtmltopdf")?;
        Ok(())
    }
}

const BINARY_CANDIDATES: &[&str] = &[
    // Linux
    "/usr/bin/wkhtmltopdf",
    "/usr/local/bin/wkhtmltopdf",
    // macOS
    "/opt/homebrew/bin/wkhtmltopdf",
];

fn find_binary() -> Option<PathBuf> {
    for candidate in BINARY_CANDIDATES {
        let path = Path::new(candidate);
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    if Command::new("which")
        .arg("wkhtmltopdf")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
    {
        return Some(PathBuf::from("wkhtmltopdf"));
    }

    None
}
