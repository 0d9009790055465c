//! CourseGen TUI — interactive terminal interface for course generation
//! and editing.
//!
//! Provides screens for creating, browsing, viewing, and editing courses,
//! built with `ratatui` + `crossterm`.

mod app;
mod screens;
mod widgets;

use color_eyre::eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;
    app::run()
}
