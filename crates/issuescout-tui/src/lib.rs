// Terminal UI implementation using ratatui
// The pretty face of IssueScout

pub mod app;
pub mod runner;
pub mod ui;

pub use app::{App, AppEvent, Command, InputMode, Screen};
pub use runner::run_tui;
