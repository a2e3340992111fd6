// src/render/browser.rs
//! Headless Chromium export via `--print-to-pdf`.
//!
//! Each call opens a [`BrowserSession`]: a private temporary directory holding
//! the markup, a throwaway profile and the output path, plus the child process.
//! The session is closed on every exit path. If a future is dropped mid-render,
//! `kill_on_drop` and the temp dir's own `Drop` still clean up.

use super::{validate_pdf, RenderError, RenderInput, RenderTier, TierRenderer};
use crate::pipeline::config::BrowserConfig;
use crate::templating::MarkupDocument;
use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::process::{Child, Command};

/// Executable names tried in order when none is configured.
pub const BROWSER_CANDIDATES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "headless_shell",
];

const MARKUP_FILE: &str = "quote.html";
const OUTPUT_FILE: &str = "quote.pdf";
const PROFILE_DIR: &str = "profile";

/// One browser process and the scratch directory it works in.
pub struct BrowserSession {
    child: Option<Child>,
    executable: String,
    output: PathBuf,
    // Removes the markup, the profile and the output when dropped or closed.
    workdir: Option<TempDir>,
}

impl BrowserSession {
    /// Writes the markup to disk and starts the first executable that spawns.
    pub async fn open(config: &BrowserConfig, markup: &MarkupDocument) -> Result<Self, RenderError> {
        let workdir = tempfile::Builder::new().prefix("estimo-browser-").tempdir()?;
        let input = workdir.path().join(MARKUP_FILE);
        let output = workdir.path().join(OUTPUT_FILE);
        let profile = workdir.path().join(PROFILE_DIR);
        tokio::fs::write(&input, markup.as_bytes()).await?;
        tokio::fs::create_dir_all(&profile).await?;

        let args = chromium_args(config, &input, &output, &profile);
        let mut last_error: Option<io::Error> = None;

        for candidate in executable_candidates(config) {
            match spawn(&candidate, &args) {
                Ok(child) => {
                    let executable = candidate.to_string_lossy().into_owned();
                    log::debug!("[BROWSER] Launched '{}' (pid {:?}).", executable, child.id());
                    return Ok(Self { child: Some(child), executable, output, workdir: Some(workdir) });
                }
                Err(e) => {
                    log::debug!("[BROWSER] Could not start '{}': {}", candidate.to_string_lossy(), e);
                    last_error = Some(e);
                }
            }
        }

        let reason = match (&config.executable, last_error) {
            (Some(path), Some(e)) => format!("'{}': {}", path.display(), e),
            (_, Some(e)) => format!("none of {:?} could be started: {}", BROWSER_CANDIDATES, e),
            (_, None) => "no browser executable configured".to_string(),
        };
        Err(RenderError::ExternalProcessUnavailable(reason))
    }

    /// Waits for the print job and returns the validated PDF bytes.
    pub async fn finish(&mut self, deadline: Duration) -> Result<Vec<u8>, RenderError> {
        let child = self
            .child
            .as_mut()
            .ok_or_else(|| RenderError::ExportFailed("browser session already closed".to_string()))?;

        let status: ExitStatus = match tokio::time::timeout(deadline, child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                log::warn!("[BROWSER] '{}' did not finish within {:?}; killing it.", self.executable, deadline);
                return Err(RenderError::RenderTimeout(deadline));
            }
        };
        // Reaped by `wait`.
        self.child = None;

        if !status.success() {
            return Err(RenderError::ExportFailed(format!("'{}' exited with {}", self.executable, status)));
        }

        let bytes = match tokio::fs::read(&self.output).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        validate_pdf(&bytes)?;
        Ok(bytes)
    }

    /// Kills the child if it is still running, waits for it, and removes the
    /// scratch directory.
    pub async fn close(mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill().await {
                log::debug!("[BROWSER] Kill failed for '{}': {}", self.executable, e);
            }
        }
        if let Some(dir) = self.workdir.take() {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                log::debug!("[BROWSER] Could not remove {}: {}", path.display(), e);
            }
        }
    }

    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_ref().map(TempDir::path)
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Some(child) = self.child.as_mut() {
            let _ = child.start_kill();
        }
    }
}

fn executable_candidates(config: &BrowserConfig) -> Vec<OsString> {
    match &config.executable {
        Some(path) => vec![path.as_os_str().to_owned()],
        None => BROWSER_CANDIDATES.iter().map(OsString::from).collect(),
    }
}

fn chromium_args(config: &BrowserConfig, input: &Path, output: &Path, profile: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "--headless",
        "--disable-gpu",
        "--disable-dev-shm-usage",
        "--no-first-run",
        "--no-pdf-header-footer",
    ]
    .iter()
    .map(OsString::from)
    .collect();

    args.push(flag("--user-data-dir=", profile));
    args.push(OsString::from(format!("--virtual-time-budget={}", config.settle_ms)));
    args.push(flag("--print-to-pdf=", output));
    args.extend(config.extra_args.iter().map(OsString::from));

    let mut url = OsString::from("file://");
    url.push(input);
    args.push(url);
    args
}

fn flag(name: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(name);
    arg.push(path);
    arg
}

fn spawn(executable: &OsString, args: &[OsString]) -> io::Result<Child> {
    Command::new(executable)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
}

/// The first tier: prints the markup with a headless browser.
#[derive(Debug, Clone, Default)]
pub struct BrowserRenderer {
    config: BrowserConfig,
}

impl BrowserRenderer {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Exports `markup` to PDF, giving up after `timeout`.
    pub async fn render_markup(&self, markup: &MarkupDocument, timeout: Duration) -> Result<Vec<u8>, RenderError> {
        if !self.config.enabled {
            return Err(RenderError::ExternalProcessUnavailable("browser tier is disabled".to_string()));
        }

        let started = Instant::now();
        let mut session = BrowserSession::open(&self.config, markup).await?;
        let result = session.finish(timeout).await;
        session.close().await;

        if let Ok(bytes) = &result {
            log::info!("[BROWSER] Exported {} bytes in {:?}.", bytes.len(), started.elapsed());
        }
        result
    }
}

#[async_trait]
impl TierRenderer for BrowserRenderer {
    fn tier(&self) -> RenderTier {
        RenderTier::Browser
    }

    async fn render(&self, input: RenderInput<'_>) -> Result<Vec<u8>, RenderError> {
        self.render_markup(input.markup, self.config.timeout()).await
    }
}
