//! Retrying assertions on locators.
//!
//! Each expectation re-probes the element until it holds or the budget runs
//! out. A failure is a [`WaitError::Timeout`] whose description carries the
//! last value seen on the page.

use regex::Regex;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use crate::locator::{ElementSnapshot, ElementState, Locator};
use crate::wait::{self, PollConfig, WaitError};

/// How expected text is compared against an element's text.
#[derive(Debug, Clone)]
pub enum TextMatcher {
    /// Equal after whitespace normalisation.
    Exact(String),
    /// Substring of the normalised text.
    Contains(String),
    Regex(Regex),
}

impl TextMatcher {
    pub fn matches(&self, actual: &str) -> bool {
        let actual = normalize_whitespace(actual);
        match self {
            Self::Exact(expected) => actual == normalize_whitespace(expected),
            Self::Contains(expected) => actual.contains(&normalize_whitespace(expected)),
            Self::Regex(re) => re.is_match(&actual),
        }
    }
}

impl std::fmt::Display for TextMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(s) => write!(f, "{:?}", s),
            Self::Contains(s) => write!(f, "containing {:?}", s),
            Self::Regex(re) => write!(f, "matching /{}/", re.as_str()),
        }
    }
}

impl From<&str> for TextMatcher {
    fn from(s: &str) -> Self {
        Self::Exact(s.to_string())
    }
}

impl From<String> for TextMatcher {
    fn from(s: String) -> Self {
        Self::Exact(s)
    }
}

impl From<Regex> for TextMatcher {
    fn from(re: Regex) -> Self {
        Self::Regex(re)
    }
}

/// Trim and collapse every whitespace run to a single space.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

struct Observation {
    passed: bool,
    observed: String,
}

impl Observation {
    fn missing() -> Self {
        Self {
            passed: false,
            observed: "<no element>".to_string(),
        }
    }
}

pub fn expect(locator: &Locator) -> Expect<'_> {
    Expect {
        locator,
        poll: locator.poll(),
    }
}

pub struct Expect<'a> {
    locator: &'a Locator,
    poll: PollConfig,
}

impl Expect<'_> {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.poll = self.poll.with_timeout(timeout);
        self
    }

    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    async fn holds<F, Fut>(&self, expectation: String, mut check: F) -> Result<(), WaitError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<Observation>>,
    {
        let last: Mutex<Option<String>> = Mutex::new(None);
        let last_seen = &last;
        let result = wait::wait_for(&expectation, self.poll, || {
            let observation = check();
            async move {
                let observation = observation.await?;
                *last_seen.lock().unwrap_or_else(|e| e.into_inner()) = Some(observation.observed);
                Ok(observation.passed.then_some(()))
            }
        })
        .await;

        match result {
            Err(WaitError::Timeout {
                description,
                elapsed,
                attempts,
            }) => {
                let observed = last
                    .into_inner()
                    .unwrap_or_else(|e| e.into_inner())
                    .unwrap_or_default();
                Err(WaitError::Timeout {
                    description: format!("{}; last observed: {}", description, observed),
                    elapsed,
                    attempts,
                })
            }
            other => other,
        }
    }

    async fn snapshot_holds<P>(&self, expectation: String, predicate: P) -> Result<(), WaitError>
    where
        P: Fn(&ElementSnapshot) -> Observation,
    {
        let locator = self.locator;
        let predicate = &predicate;
        self.holds(expectation, || async move {
            Ok(match locator.probe().await? {
                Some(snapshot) => predicate(&snapshot),
                None => Observation::missing(),
            })
        })
        .await
    }

    pub async fn to_have_text(&self, expected: impl Into<TextMatcher>) -> Result<(), WaitError> {
        let matcher = expected.into();
        let expectation = format!("text of {} to be {}", self.locator.description(), matcher);
        self.snapshot_holds(expectation, |s| Observation {
            passed: matcher.matches(&s.text_content),
            observed: format!("{:?}", normalize_whitespace(&s.text_content)),
        })
        .await
    }

    pub async fn to_contain_text(&self, expected: &str) -> Result<(), WaitError> {
        self.to_have_text(TextMatcher::Contains(expected.to_string())).await
    }

    pub async fn to_match_text(&self, pattern: &Regex) -> Result<(), WaitError> {
        self.to_have_text(TextMatcher::Regex(pattern.clone())).await
    }

    pub async fn to_have_attribute(
        &self,
        name: &str,
        expected: impl Into<TextMatcher>,
    ) -> Result<(), WaitError> {
        let matcher = expected.into();
        let expectation = format!(
            "attribute {:?} of {} to be {}",
            name,
            self.locator.description(),
            matcher
        );
        self.snapshot_holds(expectation, |s| match s.attributes.get(name) {
            Some(value) => Observation {
                passed: matcher.matches(value),
                observed: format!("{:?}", value),
            },
            None => Observation {
                passed: false,
                observed: "<no attribute>".to_string(),
            },
        })
        .await
    }

    pub async fn to_be_checked(&self) -> Result<(), WaitError> {
        self.checked_state(true).await
    }

    pub async fn to_be_unchecked(&self) -> Result<(), WaitError> {
        self.checked_state(false).await
    }

    async fn checked_state(&self, checked: bool) -> Result<(), WaitError> {
        let expectation = format!(
            "{} to be {}",
            self.locator.description(),
            if checked { "checked" } else { "unchecked" }
        );
        self.snapshot_holds(expectation, |s| Observation {
            passed: s.checked == checked,
            observed: format!("checked={}", s.checked),
        })
        .await
    }

    pub async fn to_be_visible(&self) -> Result<(), WaitError> {
        self.to_be(ElementState::Visible).await
    }

    pub async fn to_be_hidden(&self) -> Result<(), WaitError> {
        self.to_be(ElementState::Hidden).await
    }

    pub async fn to_be(&self, state: ElementState) -> Result<(), WaitError> {
        let locator = self.locator;
        let expectation = format!("{} to be {}", locator.description(), state);
        self.holds(expectation, || async move {
            let snapshot = locator.probe().await?;
            Ok(Observation {
                passed: state.is_satisfied_by(snapshot.as_ref()),
                observed: match snapshot {
                    None => "<no element>".to_string(),
                    Some(s) if s.visible => "visible".to_string(),
                    Some(_) => "hidden".to_string(),
                },
            })
        })
        .await
    }

    pub async fn to_have_count(&self, expected: usize) -> Result<(), WaitError> {
        let locator = self.locator;
        let expectation = format!("{} to match {} elements", locator.description(), expected);
        self.holds(expectation, || async move {
            let count = locator.count().await?;
            Ok(Observation {
                passed: count == expected,
                observed: format!("{} elements", count),
            })
        })
        .await
    }
}
