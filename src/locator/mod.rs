mod actions;
mod state;

pub use state::{ElementSnapshot, ElementState};

use anyhow::{Context, Result};
use chromiumoxide::page::Page;
use serde::Deserialize;
use std::time::Duration;

use crate::selectors::{self, Step};
use crate::wait::{self, PollConfig, WaitError};

/// A lazy reference to a region of the page.
///
/// Nothing is queried until a read, wait or action runs, so a locator can be
/// built before the element exists and stays valid across re-renders.
#[derive(Clone)]
pub struct Locator {
    page: Page,
    steps: Vec<Step>,
    poll: PollConfig,
}

impl std::fmt::Debug for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Locator")
            .field("steps", &self.description())
            .field("poll", &self.poll)
            .finish()
    }
}

#[derive(Deserialize)]
struct Probe {
    element: Option<ElementSnapshot>,
}

impl Locator {
    /// The whole page, scoped to `<body>`.
    pub fn body(page: Page) -> Self {
        Self::new(page, "//body")
    }

    pub fn new(page: Page, xpath: &str) -> Self {
        Self {
            page,
            steps: vec![Step::new(xpath)],
            poll: PollConfig::default(),
        }
    }

    /// Use `poll` for this locator and every locator derived from it.
    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Child query, evaluated relative to the first match of `self`.
    pub fn locator(&self, xpath: &str) -> Locator {
        let mut steps = self.steps.clone();
        steps.push(Step::new(xpath));
        Locator {
            page: self.page.clone(),
            steps,
            poll: self.poll,
        }
    }

    pub fn nth(&self, index: usize) -> Locator {
        let mut located = self.clone();
        if let Some(last) = located.steps.last_mut() {
            last.nth = Some(index);
        }
        located
    }

    pub fn first(&self) -> Locator {
        self.nth(0)
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn poll(&self) -> PollConfig {
        self.poll
    }

    pub fn description(&self) -> String {
        selectors::describe(&self.steps)
    }

    async fn evaluate<T: serde::de::DeserializeOwned>(&self, body: &str, what: &str) -> Result<T> {
        let js = selectors::chain_script(&self.steps, body)?;
        self.page
            .evaluate(js)
            .await
            .with_context(|| format!("Failed to {} for {}", what, self.description()))?
            .into_value()
            .with_context(|| format!("Failed to parse {} result for {}", what, self.description()))
    }

    /// One query of the element's current state. Absence is `Ok(None)`.
    pub async fn probe(&self) -> Result<Option<ElementSnapshot>> {
        let probe: Probe = self.evaluate(state::SNAPSHOT_JS, "probe element").await?;
        Ok(probe.element)
    }

    async fn require(&self) -> Result<ElementSnapshot> {
        self.probe()
            .await?
            .with_context(|| format!("Element not found: {}", self.description()))
    }

    pub async fn count(&self) -> Result<usize> {
        self.evaluate("return matches.length;", "count elements").await
    }

    /// One locator per current match, in document order.
    pub async fn all(&self) -> Result<Vec<Locator>> {
        let count = self.count().await?;
        Ok((0..count).map(|i| self.nth(i)).collect())
    }

    pub async fn is_attached(&self) -> Result<bool> {
        Ok(self.probe().await?.is_some())
    }

    pub async fn is_visible(&self) -> Result<bool> {
        Ok(self.probe().await?.map(|s| s.visible).unwrap_or(false))
    }

    pub async fn is_checked(&self) -> Result<bool> {
        Ok(self.require().await?.checked)
    }

    pub async fn text_content(&self) -> Result<String> {
        Ok(self.require().await?.text_content)
    }

    pub async fn inner_text(&self) -> Result<String> {
        Ok(self.require().await?.inner_text)
    }

    pub async fn get_attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.require().await?.attributes.get(name).cloned())
    }

    pub async fn input_value(&self) -> Result<String> {
        let snapshot = self.require().await?;
        snapshot
            .value
            .with_context(|| format!("Element has no value: {}", self.description()))
    }

    /// Wait until the element reaches `state`, within this locator's budget.
    pub async fn wait_for(&self, state: ElementState) -> Result<(), WaitError> {
        self.wait_for_within(state, self.poll).await
    }

    pub async fn wait_for_within(
        &self,
        state: ElementState,
        poll: PollConfig,
    ) -> Result<(), WaitError> {
        let description = format!("{} to be {}", self.description(), state);
        wait::wait_for(&description, poll, || async move {
            let snapshot = self.probe().await?;
            Ok(state.is_satisfied_by(snapshot.as_ref()).then_some(()))
        })
        .await
    }

    /// Child locator, optionally waiting for it to exist.
    ///
    /// A zero `wait` returns the locator without touching the page.
    pub async fn locate_waiting(&self, xpath: &str, wait: Duration) -> Result<Locator, WaitError> {
        let child = self.locator(xpath);
        if wait.is_zero() {
            return Ok(child);
        }
        let poll = self.poll.with_timeout(wait);
        let description = format!("element with xpath: {}", child.description());
        let probe = &child;
        wait::wait_for(&description, poll, || async move {
            Ok((probe.count().await? > 0).then_some(()))
        })
        .await?;
        Ok(child)
    }
}
