use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;

use super::dialogs::{self, DialogLog, DialogPolicy};
use super::launcher;

/// How to start the browser for a suite run.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub headless: bool,
    pub no_sandbox: bool,
    pub chrome_path: Option<PathBuf>,
    pub window_size: (u32, u32),
    pub dialogs: DialogPolicy,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            no_sandbox: false,
            chrome_path: None,
            window_size: (1280, 720),
            dialogs: DialogPolicy::Accept,
        }
    }
}

/// One Chrome process driving one page.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    dialogs: DialogLog,
    handler_task: tokio::task::JoinHandle<()>,
    dialog_task: tokio::task::JoinHandle<()>,
    _profile: tempfile::TempDir,
}

impl BrowserSession {
    /// Launch Chrome with a throwaway profile and open a blank page.
    pub async fn launch(options: &BrowserOptions) -> Result<Self> {
        let profile = tempfile::tempdir().context("Failed to create Chrome profile directory")?;
        let (width, height) = options.window_size;

        let mut builder = BrowserConfig::builder()
            .user_data_dir(profile.path())
            .args(launcher::default_chrome_args(options.no_sandbox))
            .window_size(width, height);

        if !options.headless {
            builder = builder.with_head();
        }

        match launcher::find_chrome_binary(options.chrome_path.as_deref()) {
            Ok(path) => builder = builder.chrome_executable(path),
            Err(e) if options.chrome_path.is_some() => return Err(e),
            Err(e) => tracing::warn!("{}; leaving discovery to chromiumoxide", e),
        }

        let config = builder.build().map_err(|e| anyhow::anyhow!("{}", e))?;

        let (browser, mut handler) =
            Browser::launch(config).await.context("Failed to launch Chrome")?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler error: {}", e);
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("Failed to create initial page")?;

        let dialogs = DialogLog::new();
        let dialog_task = dialogs::install(&page, options.dialogs, dialogs.clone()).await?;

        tracing::info!(
            "Browser session started (headless: {}, dialogs: {:?})",
            options.headless,
            options.dialogs
        );

        Ok(Self {
            browser,
            page,
            dialogs,
            handler_task,
            dialog_task,
            _profile: profile,
        })
    }

    /// Navigate and wait for the load event.
    pub async fn goto(&self, url: &str) -> Result<()> {
        tracing::info!("Navigating to: {}", url);
        self.page
            .goto(url)
            .await
            .with_context(|| format!("Failed to navigate to {}", url))?;
        Ok(())
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn dialogs(&self) -> &DialogLog {
        &self.dialogs
    }

    /// Close Chrome and stop the background tasks.
    pub async fn close(mut self) -> Result<()> {
        let closed = self.browser.close().await.context("Failed to close Chrome");
        if closed.is_ok() {
            let _ = self.browser.wait().await;
        }
        self.dialog_task.abort();
        self.handler_task.abort();
        tracing::info!("Browser session closed");
        closed.map(|_| ())
    }
}
