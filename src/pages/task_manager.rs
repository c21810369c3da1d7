use anyhow::{Context, Result};

use super::{Card, CompletedTasksCard, Locate, TaskListCard, Text};
use crate::browser::BrowserSession;
use crate::locator::{ElementState, Locator};
use crate::wait::PollConfig;

#[derive(Debug, Clone)]
pub struct TaskManagerPage {
    body: Locator,
    pub daily_tip_card: DailyTipCard,
    pub add_new_task_card: AddNewTaskCard,
    pub task_list_card: TaskListCard,
    pub completed_tasks_card: CompletedTasksCard,
}

impl TaskManagerPage {
    /// Build the page objects under `body`. Nothing is queried yet.
    pub fn new(body: Locator) -> Self {
        Self {
            daily_tip_card: DailyTipCard::new(Card::titled(&body, Text::DailyTip)),
            add_new_task_card: AddNewTaskCard::new(Card::titled(&body, Text::AddNewTask)),
            task_list_card: TaskListCard::new(Card::titled(&body, Text::TaskList)),
            completed_tasks_card: CompletedTasksCard::new(Card::titled(
                &body,
                Text::CompletedTasks,
            )),
            body,
        }
    }

    /// Navigate the session to `url` and wait for every card to render.
    pub async fn open(session: &BrowserSession, url: &str, poll: PollConfig) -> Result<Self> {
        session.goto(url).await?;
        let page = Self::new(Locator::body(session.page().clone()).with_poll(poll));
        page.wait_until_ready().await?;
        Ok(page)
    }

    pub async fn wait_until_ready(&self) -> Result<()> {
        let cards = [
            (Text::DailyTip, self.daily_tip_card.card().root()),
            (Text::AddNewTask, self.add_new_task_card.card().root()),
            (Text::TaskList, self.task_list_card.card().root()),
            (Text::CompletedTasks, self.completed_tasks_card.card().root()),
        ];
        for (title, root) in cards {
            root.wait_for(ElementState::Attached)
                .await
                .with_context(|| format!("The {} card did not render", title))?;
        }
        tracing::debug!("Task manager page ready");
        Ok(())
    }

    pub fn heading(&self) -> Locator {
        self.locate(".//h1")
    }
}

impl Locate for TaskManagerPage {
    fn root(&self) -> &Locator {
        &self.body
    }
}

#[derive(Debug, Clone)]
pub struct DailyTipCard {
    card: Card,
}

impl DailyTipCard {
    pub fn new(card: Card) -> Self {
        Self { card }
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn tip_text(&self) -> Locator {
        self.card.locate(".//p")
    }
}

#[derive(Debug, Clone)]
pub struct AddNewTaskCard {
    card: Card,
}

impl AddNewTaskCard {
    pub fn new(card: Card) -> Self {
        Self { card }
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn input_field(&self) -> Locator {
        self.card.locate(".//input")
    }

    pub fn priority(&self) -> Locator {
        self.card.locate(".//select")
    }

    pub fn button(&self) -> Locator {
        self.card.locate(".//button")
    }

    /// Type `text`, optionally pick a priority, and press "Add Task".
    pub async fn add_task(&self, text: &str, priority: Option<&str>) -> Result<()> {
        self.input_field().fill(text).await?;
        if let Some(priority) = priority {
            self.priority().select_option(priority).await?;
        }
        self.button().click().await?;
        tracing::info!("Submitted task {:?}", text);
        Ok(())
    }
}
