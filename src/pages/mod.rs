//! Page objects for the task manager demo page.
//!
//! Sections are plain structs holding their root [`Locator`]; child lookups
//! go through [`Locate`].

mod task_list;
mod task_manager;

pub use task_list::{Checkbox, CompletedTasksCard, TaskItem, TaskList, TaskListCard};
pub use task_manager::{AddNewTaskCard, DailyTipCard, TaskManagerPage};

use crate::locator::Locator;

/// Visible strings of the page under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    LoadingYourDailyTip,
    StayFocusedAndPrioritize,
    TaskManager,
    DailyTip,
    AddNewTask,
    TaskList,
    AddTask,
    SetPriority,
    CompletedTasks,
    ShowCompletedTasks,
}

impl Text {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoadingYourDailyTip => "Loading your daily tip...",
            Self::StayFocusedAndPrioritize => {
                "Stay focused and prioritize your most important tasks!"
            }
            Self::TaskManager => "Task Manager",
            Self::DailyTip => "Daily Tip",
            Self::AddNewTask => "Add New Task",
            Self::TaskList => "Task List",
            Self::AddTask => "Add Task",
            Self::SetPriority => "Set Priority",
            Self::CompletedTasks => "Completed Tasks",
            Self::ShowCompletedTasks => "Show Completed Tasks",
        }
    }
}

impl std::fmt::Display for Text {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything scoped to a root element that can look up its children.
pub trait Locate {
    fn root(&self) -> &Locator;

    fn locate(&self, xpath: &str) -> Locator {
        self.root().locator(xpath)
    }
}

/// A titled `div` section of the page.
#[derive(Debug, Clone)]
pub struct Card {
    root: Locator,
}

impl Card {
    pub fn new(root: Locator) -> Self {
        Self { root }
    }

    /// The section containing a direct child whose text contains `title`.
    pub fn titled(scope: &Locator, title: Text) -> Self {
        Self::new(scope.locator(&crate::selectors::xpath::section_by_title(title.as_str())))
    }

    pub fn title(&self) -> Locator {
        self.locate(".//h2")
    }
}

impl Locate for Card {
    fn root(&self) -> &Locator {
        &self.root
    }
}
