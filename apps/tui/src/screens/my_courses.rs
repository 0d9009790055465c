//! "My Courses" screen — lists stored courses.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use coursegen_shared::CourseSummary;
use coursegen_store::CourseStore;

use super::Action;

pub(crate) struct MyCoursesScreen {
    entries: Vec<CourseSummary>,
    selected: usize,
    status: String,
}

impl MyCoursesScreen {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            selected: 0,
            status: "Press 'r' to refresh the course list.".to_string(),
        }
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Min(1),    // List
                Constraint::Length(3), // Status
            ])
            .split(area);

        if self.entries.is_empty() {
            let empty = Paragraph::new(
                "No courses found.\n\nUse the 'Create Course' tab to generate one, \
                 or press 'r' to rescan the course directory.",
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Courses "));
            f.render_widget(empty, chunks[0]);
        } else {
            let items: Vec<ListItem> = self
                .entries
                .iter()
                .enumerate()
                .map(|(i, summary)| {
                    let style = if i == self.selected {
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    let prefix = if i == self.selected { "▸ " } else { "  " };
                    ListItem::new(format!(
                        "{prefix}{}  ({})  [{}]",
                        summary.topic,
                        summary.created_at.format("%Y-%m-%d %H:%M"),
                        summary.id
                    ))
                    .style(style)
                })
                .collect();

            let list = List::new(items).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Courses ({}) ", self.entries.len())),
            );
            f.render_widget(list, chunks[0]);
        }

        let status = Paragraph::new(self.status.as_str())
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(status, chunks[1]);
    }

    pub(crate) fn handle_key(
        &mut self,
        code: KeyCode,
        _modifiers: KeyModifiers,
        store: &CourseStore,
    ) -> Action {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                if self.selected > 0 {
                    self.selected -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.entries.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('r') => {
                self.refresh(store);
            }
            KeyCode::Enter => {
                if let Some(summary) = self.entries.get(self.selected) {
                    return Action::OpenCourse(summary.id);
                }
            }
            KeyCode::Char('d') => {
                if let Some(summary) = self.entries.get(self.selected) {
                    let id = summary.id;
                    match store.delete(&id) {
                        Ok(()) => {
                            self.status = format!("Deleted {id}");
                            self.refresh(store);
                        }
                        Err(e) => self.status = format!("Delete failed: {e}"),
                    }
                    return Action::Status(self.status.clone());
                }
            }
            _ => {}
        }
        Action::None
    }

    fn refresh(&mut self, store: &CourseStore) {
        match store.list() {
            Ok(entries) => {
                self.status = format!("Found {} course(s).", entries.len());
                self.entries = entries;
                if self.selected >= self.entries.len() {
                    self.selected = self.entries.len().saturating_sub(1);
                }
            }
            Err(e) => self.status = format!("Scan failed: {e}"),
        }
    }
}
