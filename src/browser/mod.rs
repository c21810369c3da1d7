pub mod dialogs;
pub mod launcher;
pub mod session;

pub use dialogs::{DialogEntry, DialogLog, DialogPolicy};
pub use session::{BrowserOptions, BrowserSession};
