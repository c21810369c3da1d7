use anyhow::Result;

use super::{Card, Locate};
use crate::locator::Locator;
use crate::selectors::xpath;

#[derive(Debug, Clone)]
pub struct TaskListCard {
    card: Card,
}

impl TaskListCard {
    pub fn new(card: Card) -> Self {
        Self { card }
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn task_list(&self) -> TaskList {
        TaskList::new(self.card.locate(".//ul"))
    }
}

#[derive(Debug, Clone)]
pub struct TaskList {
    root: Locator,
}

impl TaskList {
    pub fn new(root: Locator) -> Self {
        Self { root }
    }

    /// All `<li>` rows, for counting.
    pub fn items(&self) -> Locator {
        self.locate(".//li")
    }

    /// The rows present right now, newest first.
    pub async fn tasks(&self) -> Result<Vec<TaskItem>> {
        Ok(self
            .items()
            .all()
            .await?
            .into_iter()
            .map(TaskItem::new)
            .collect())
    }

    pub async fn task_count(&self) -> Result<usize> {
        self.items().count().await
    }

    pub fn first_task(&self) -> TaskItem {
        TaskItem::new(self.items().first())
    }

    /// The first row whose label is exactly `text` (whitespace-normalised).
    pub fn task_with_text(&self, text: &str) -> TaskItem {
        TaskItem::new(
            self.locate(&format!(
                ".//li[span[normalize-space(.)=normalize-space({})]]",
                xpath::literal(text)
            ))
            .first(),
        )
    }
}

impl Locate for TaskList {
    fn root(&self) -> &Locator {
        &self.root
    }
}

#[derive(Debug, Clone)]
pub struct TaskItem {
    root: Locator,
}

impl TaskItem {
    pub fn new(root: Locator) -> Self {
        Self { root }
    }

    pub fn text_elem(&self) -> Locator {
        self.locate(".//span")
    }

    pub async fn text(&self) -> Result<String> {
        self.text_elem().inner_text().await
    }

    pub fn checkbox(&self) -> Checkbox {
        Checkbox::new(self.locate(".//input[@type='checkbox']"))
    }

    pub fn delete_button(&self) -> Locator {
        self.locate(".//button")
    }

    pub async fn is_text_line_through(&self) -> Result<bool> {
        let style = self.text_elem().get_attribute("style").await?;
        Ok(style.is_some_and(|s| s.contains("line-through")))
    }
}

impl Locate for TaskItem {
    fn root(&self) -> &Locator {
        &self.root
    }
}

#[derive(Debug, Clone)]
pub struct Checkbox {
    root: Locator,
}

impl Checkbox {
    pub fn new(root: Locator) -> Self {
        Self { root }
    }

    pub async fn check(&self) -> Result<()> {
        self.root.check().await
    }

    pub async fn uncheck(&self) -> Result<()> {
        self.root.uncheck().await
    }

    pub async fn is_checked(&self) -> Result<bool> {
        self.root.is_checked().await
    }
}

impl Locate for Checkbox {
    fn root(&self) -> &Locator {
        &self.root
    }
}

#[derive(Debug, Clone)]
pub struct CompletedTasksCard {
    card: Card,
}

impl CompletedTasksCard {
    pub fn new(card: Card) -> Self {
        Self { card }
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    /// The "Show Completed Tasks" toggle.
    pub fn show_completed(&self) -> Checkbox {
        Checkbox::new(self.card.locate(".//input[@type='checkbox']"))
    }

    pub fn completed_list(&self) -> Locator {
        self.card.locate(".//ul")
    }

    pub fn completed_item(&self, text: &str) -> Locator {
        self.completed_list().locator(&format!(
            ".//li[normalize-space(.)=normalize-space({})]",
            xpath::literal(text)
        ))
    }

    pub async fn completed_texts(&self) -> Result<Vec<String>> {
        let mut texts = Vec::new();
        for item in self.completed_list().locator(".//li").all().await? {
            texts.push(item.text_content().await?.trim().to_string());
        }
        Ok(texts)
    }
}
