//! The task manager suite: parametrised cases, each run on a freshly loaded
//! page.

use anyhow::{ensure, Context, Result};
use std::time::{Duration, Instant};

use crate::browser::BrowserSession;
use crate::expect::{expect, normalize_whitespace, TextMatcher};
use crate::pages::{Locate, TaskManagerPage, Text};
use crate::wait::PollConfig;

pub const TIP_TIMEOUTS_MS: [u64; 4] = [1000, 2000, 3000, 4000];

pub const TASK_TEXTS: [&str; 8] = [
    "New Test Task!",
    "1234567890,",
    "!@#$%^&*()",
    "",
    " ",
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890!@#$%^&*()",
];

const SAMPLE_TASK: &str = "New Test Task!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Scenario {
    DailyTip,
    AddTask,
    CompleteTask,
    DeleteTask,
    ShowCompleted,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::DailyTip,
        Scenario::AddTask,
        Scenario::CompleteTask,
        Scenario::DeleteTask,
        Scenario::ShowCompleted,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::DailyTip => "daily-tip",
            Self::AddTask => "add-task",
            Self::CompleteTask => "complete-task",
            Self::DeleteTask => "delete-task",
            Self::ShowCompleted => "show-completed",
        }
    }

    pub fn cases(self) -> Vec<Case> {
        match self {
            Self::DailyTip => TIP_TIMEOUTS_MS
                .iter()
                .map(|ms| Case::DailyTip {
                    timeout: Duration::from_millis(*ms),
                })
                .collect(),
            Self::AddTask => TASK_TEXTS
                .iter()
                .map(|text| Case::AddTask {
                    text: text.to_string(),
                })
                .collect(),
            Self::CompleteTask => vec![Case::CompleteTask {
                text: SAMPLE_TASK.to_string(),
            }],
            Self::DeleteTask => vec![Case::DeleteTask {
                text: SAMPLE_TASK.to_string(),
            }],
            Self::ShowCompleted => vec![Case::ShowCompleted {
                text: SAMPLE_TASK.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Case {
    DailyTip { timeout: Duration },
    AddTask { text: String },
    CompleteTask { text: String },
    DeleteTask { text: String },
    ShowCompleted { text: String },
}

impl Case {
    pub fn scenario(&self) -> Scenario {
        match self {
            Self::DailyTip { .. } => Scenario::DailyTip,
            Self::AddTask { .. } => Scenario::AddTask,
            Self::CompleteTask { .. } => Scenario::CompleteTask,
            Self::DeleteTask { .. } => Scenario::DeleteTask,
            Self::ShowCompleted { .. } => Scenario::ShowCompleted,
        }
    }

    pub fn label(&self) -> String {
        let name = self.scenario().name();
        match self {
            Self::DailyTip { timeout } => format!("{}[{}ms]", name, timeout.as_millis()),
            Self::AddTask { text }
            | Self::CompleteTask { text }
            | Self::DeleteTask { text }
            | Self::ShowCompleted { text } => format!("{}[{:?}]", name, text),
        }
    }

    /// Load `url` and run the case against it.
    pub async fn run(&self, session: &BrowserSession, url: &str, poll: PollConfig) -> Result<()> {
        let page = TaskManagerPage::open(session, url, poll).await?;
        match self {
            Self::DailyTip { timeout } => daily_tip_loads(&page, *timeout).await,
            Self::AddTask { text } => add_task(&page, text, poll).await,
            Self::CompleteTask { text } => complete_task(&page, text).await,
            Self::DeleteTask { text } => delete_task(session, &page, text).await,
            Self::ShowCompleted { text } => show_completed(&page, text).await,
        }
    }
}

pub async fn daily_tip_loads(page: &TaskManagerPage, timeout: Duration) -> Result<()> {
    let expected = Text::StayFocusedAndPrioritize;
    expect(&page.daily_tip_card.tip_text())
        .with_timeout(timeout)
        .to_have_text(expected.as_str())
        .await
        .with_context(|| {
            format!(
                "The daily tip text {:?} did not load within {}ms",
                expected.as_str(),
                timeout.as_millis()
            )
        })
}

/// Submit `text`; a non-blank task shows up first in the list, a blank one
/// is ignored.
pub async fn add_task(page: &TaskManagerPage, text: &str, poll: PollConfig) -> Result<()> {
    let list = page.task_list_card.task_list();
    let before = list.task_count().await?;
    page.add_new_task_card.add_task(text, None).await?;

    if normalize_whitespace(text).is_empty() {
        tokio::time::sleep(poll.interval()).await;
        expect(&list.items())
            .with_poll(PollConfig::no_wait())
            .to_have_count(before)
            .await
            .context("A blank task was added to the list")?;
        return Ok(());
    }

    expect(&list.items()).to_have_count(before + 1).await?;
    expect(&list.first_task().text_elem()).to_have_text(text).await?;
    Ok(())
}

pub async fn complete_task(page: &TaskManagerPage, text: &str) -> Result<()> {
    page.add_new_task_card.add_task(text, None).await?;
    let task = page.task_list_card.task_list().task_with_text(text);
    task.checkbox().check().await?;

    expect(&task.text_elem())
        .to_have_attribute("style", TextMatcher::Contains("line-through".into()))
        .await?;
    ensure!(
        task.is_text_line_through().await?,
        "Completed task {:?} is not struck through",
        text
    );
    Ok(())
}

/// Delete a task through its button; the page asks for confirmation, which
/// the session's dialog handler answers.
pub async fn delete_task(
    session: &BrowserSession,
    page: &TaskManagerPage,
    text: &str,
) -> Result<()> {
    page.add_new_task_card.add_task(text, None).await?;
    let list = page.task_list_card.task_list();
    let task = list.task_with_text(text);
    expect(task.root()).to_be_visible().await?;
    let before = list.task_count().await?;

    session.dialogs().clear().await;
    task.delete_button().click().await?;

    let dialog = session
        .dialogs()
        .last()
        .await
        .context("Deleting a task did not ask for confirmation")?;
    if dialog.accepted {
        expect(&list.items()).to_have_count(before.saturating_sub(1)).await?;
    } else {
        expect(&list.items()).to_have_count(before).await?;
    }
    Ok(())
}

pub async fn show_completed(page: &TaskManagerPage, text: &str) -> Result<()> {
    page.add_new_task_card.add_task(text, None).await?;
    let task = page.task_list_card.task_list().task_with_text(text);
    task.checkbox().check().await?;

    let card = &page.completed_tasks_card;
    expect(&card.completed_list()).to_be_hidden().await?;
    card.show_completed().check().await?;
    expect(&card.completed_list()).to_be_visible().await?;
    expect(&card.completed_item(text)).to_be_visible().await?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub label: String,
    pub error: Option<String>,
    pub duration: Duration,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    pub outcomes: Vec<CaseOutcome>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed, {} total",
            self.passed(),
            self.failed(),
            self.outcomes.len()
        )
    }
}

/// Run every case of `scenarios` in order. A failing case does not stop the
/// suite.
pub async fn run(
    session: &BrowserSession,
    url: &str,
    poll: PollConfig,
    scenarios: &[Scenario],
) -> SuiteReport {
    let mut report = SuiteReport::default();
    for scenario in scenarios {
        for case in scenario.cases() {
            let label = case.label();
            let start = Instant::now();
            let result = case.run(session, url, poll).await;
            let duration = start.elapsed();
            match &result {
                Ok(()) => tracing::info!("PASS {} ({}ms)", label, duration.as_millis()),
                Err(e) => tracing::error!("FAIL {} ({}ms): {:#}", label, duration.as_millis(), e),
            }
            report.outcomes.push(CaseOutcome {
                label,
                error: result.err().map(|e| format!("{:#}", e)),
                duration,
            });
        }
    }
    report
}

/// Final verdict once the browser is gone. A failed close is only logged;
/// the exit status comes from the suite.
pub fn conclude(report: Option<SuiteReport>, closed: Result<()>) -> Result<()> {
    if let Err(e) = closed {
        tracing::warn!("Failed to close browser: {:#}", e);
    }

    match report {
        Some(report) if report.is_success() => {
            tracing::info!("{}", report.summary());
            Ok(())
        }
        Some(report) => {
            for outcome in report.outcomes.iter().filter(|o| !o.passed()) {
                tracing::error!("failed: {}", outcome.label);
            }
            anyhow::bail!("Suite failed: {}", report.summary())
        }
        None => anyhow::bail!("Suite interrupted"),
    }
}
