use clap::Parser;
use std::path::PathBuf;

use crate::browser::{BrowserOptions, DialogPolicy};
use crate::scenarios::Scenario;
use crate::wait::{PollConfig, PollConfigError};

pub const DEFAULT_URL: &str = "https://demo.visionect.com/tasks/index.html";

/// task-manager-e2e: end-to-end checks for the task manager demo page
#[derive(Debug, Clone, Parser)]
#[command(name = "task-manager-e2e", version, about)]
pub struct SuiteConfig {
    /// Page under test
    #[arg(long, env = "TASK_MANAGER_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Run Chrome with a visible window (default: headless)
    #[arg(long, env = "TASK_MANAGER_HEADED")]
    pub headed: bool,

    /// Start Chrome with --no-sandbox (needed in most containers)
    #[arg(long, env = "TASK_MANAGER_NO_SANDBOX")]
    pub no_sandbox: bool,

    /// Chrome or Chromium binary (default: search well-known locations and PATH)
    #[arg(long, env = "CHROME_PATH")]
    pub chrome: Option<PathBuf>,

    /// Default wait budget for element states and expectations, in milliseconds
    #[arg(long, env = "TASK_MANAGER_TIMEOUT_MS", default_value_t = 5000)]
    pub timeout_ms: u64,

    /// Delay between probes while waiting, in milliseconds (must be > 0)
    #[arg(long, env = "TASK_MANAGER_INTERVAL_MS", default_value_t = 100)]
    pub interval_ms: u64,

    /// How to answer alert/confirm/prompt dialogs
    #[arg(long, env = "TASK_MANAGER_DIALOGS", value_enum, default_value_t = DialogPolicy::Accept)]
    pub dialogs: DialogPolicy,

    /// Scenario to run; repeat or comma-separate to run several (default: all)
    #[arg(long = "scenario", env = "TASK_MANAGER_SCENARIOS", value_enum, value_delimiter = ',')]
    pub scenarios: Vec<Scenario>,
}

impl SuiteConfig {
    pub fn poll_config(&self) -> Result<PollConfig, PollConfigError> {
        PollConfig::from_millis(self.timeout_ms, self.interval_ms)
    }

    pub fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            headless: !self.headed,
            no_sandbox: self.no_sandbox,
            chrome_path: self.chrome.clone(),
            dialogs: self.dialogs,
            ..BrowserOptions::default()
        }
    }

    pub fn selected_scenarios(&self) -> Vec<Scenario> {
        if self.scenarios.is_empty() {
            Scenario::ALL.to_vec()
        } else {
            self.scenarios.clone()
        }
    }
}
