use anyhow::{Context, Result};
use chromiumoxide::cdp::browser_protocol::page::{
    EventJavascriptDialogOpening, HandleJavaScriptDialogParams,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// What to do with `alert`, `confirm` and `prompt` dialogs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum DialogPolicy {
    #[default]
    Accept,
    Dismiss,
}

impl DialogPolicy {
    pub fn accepts(&self) -> bool {
        matches!(self, Self::Accept)
    }
}

/// A dialog the page opened.
#[derive(Debug, Clone, Serialize)]
pub struct DialogEntry {
    pub kind: String,
    pub message: String,
    pub accepted: bool,
}

/// Dialogs seen during a session, oldest first.
#[derive(Debug, Clone, Default)]
pub struct DialogLog {
    entries: Arc<Mutex<Vec<DialogEntry>>>,
}

impl DialogLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, entry: DialogEntry) {
        let mut entries = self.entries.lock().await;
        if entries.len() >= 100 {
            entries.remove(0);
        }
        entries.push(entry);
    }

    pub async fn entries(&self) -> Vec<DialogEntry> {
        self.entries.lock().await.clone()
    }

    pub async fn last(&self) -> Option<DialogEntry> {
        self.entries.lock().await.last().cloned()
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}

/// Answer every dialog `page` opens according to `policy`, recording each in
/// `log` before it is closed.
pub async fn install(
    page: &Page,
    policy: DialogPolicy,
    log: DialogLog,
) -> Result<tokio::task::JoinHandle<()>> {
    let mut dialogs = page
        .event_listener::<EventJavascriptDialogOpening>()
        .await
        .context("Failed to subscribe to dialog events")?;
    let page = page.clone();

    Ok(tokio::spawn(async move {
        while let Some(dialog) = dialogs.next().await {
            let accepted = policy.accepts();
            let kind = format!("{:?}", dialog.r#type).to_lowercase();
            tracing::info!(
                "{} dialog {:?}: {}",
                kind,
                dialog.message,
                if accepted { "accepting" } else { "dismissing" }
            );
            log.add(DialogEntry {
                kind: kind.clone(),
                message: dialog.message.clone(),
                accepted,
            })
            .await;

            if let Err(e) = page
                .execute(HandleJavaScriptDialogParams::new(accepted))
                .await
            {
                tracing::warn!("Failed to handle {} dialog: {}", kind, e);
            }
        }
    }))
}
