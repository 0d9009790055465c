//! "Edit Metadata" screen — course-level title, description, duration,
//! prerequisites, and outcomes.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use coursegen_shared::{Course, CourseId, Result};
use coursegen_store::CourseStore;

use super::{Action, join_list, split_list};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Description,
    Duration,
    Prerequisites,
    Outcomes,
}

pub(crate) struct EditMetadataScreen {
    course: Option<Course>,
    title: String,
    description: String,
    duration: String,
    /// Semicolon-separated prerequisites.
    prerequisites: String,
    /// Semicolon-separated learning outcomes.
    outcomes: String,
    focused: Field,
    editing: bool,
    status: String,
}

impl EditMetadataScreen {
    pub(crate) fn new() -> Self {
        Self {
            course: None,
            title: String::new(),
            description: String::new(),
            duration: String::new(),
            prerequisites: String::new(),
            outcomes: String::new(),
            focused: Field::Title,
            editing: false,
            status: "Open a course from the details screen ('m').".to_string(),
        }
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing
    }

    /// Load a course and populate the edit fields.
    pub(crate) fn open(&mut self, store: &CourseStore, id: &CourseId) -> Result<()> {
        let course = store.load(id)?;
        self.title = course
            .metadata
            .title
            .clone()
            .unwrap_or_else(|| course.topic.clone());
        self.description = course.metadata.description.clone().unwrap_or_default();
        self.duration = course
            .metadata
            .estimated_duration
            .clone()
            .unwrap_or_default();
        self.prerequisites = join_list(&course.metadata.prerequisites);
        self.outcomes = join_list(&course.metadata.outcomes);
        self.focused = Field::Title;
        self.editing = false;
        self.status = "Enter to edit a field · s to save".to_string();
        self.course = Some(course);
        Ok(())
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect) {
        if self.course.is_none() {
            let empty = Paragraph::new(
                "No course open for editing.\n\nOpen one from 'Course Details' with 'm'.",
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Edit Metadata "));
            f.render_widget(empty, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Description
                Constraint::Length(3), // Duration
                Constraint::Length(3), // Prerequisites
                Constraint::Length(3), // Outcomes
                Constraint::Length(1), // Hint
                Constraint::Min(1),    // Status
            ])
            .split(area);

        self.draw_field(f, chunks[0], Field::Title, " Title ", &self.title);
        self.draw_field(
            f,
            chunks[1],
            Field::Description,
            " Description ",
            &self.description,
        );
        self.draw_field(
            f,
            chunks[2],
            Field::Duration,
            " Estimated duration ",
            &self.duration,
        );
        self.draw_field(
            f,
            chunks[3],
            Field::Prerequisites,
            " Prerequisites (separate with ';') ",
            &self.prerequisites,
        );
        self.draw_field(
            f,
            chunks[4],
            Field::Outcomes,
            " Outcomes (separate with ';') ",
            &self.outcomes,
        );

        let hint = if self.editing {
            "Type to edit · Esc to stop editing · Tab to next field"
        } else {
            "Enter to edit · Tab to next field · s to save"
        };
        let hint_p = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(hint_p, chunks[5]);

        let status = Paragraph::new(self.status.as_str())
            .block(Block::default().borders(Borders::ALL).title(" Status "));
        f.render_widget(status, chunks[6]);
    }

    fn draw_field(&self, f: &mut Frame, area: Rect, field: Field, title: &str, value: &str) {
        let style = if self.focused == field && self.editing {
            Style::default().fg(Color::Yellow)
        } else if self.focused == field {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(style);
        f.render_widget(Paragraph::new(value).block(block), area);
    }

    pub(crate) fn handle_key(
        &mut self,
        code: KeyCode,
        _modifiers: KeyModifiers,
        store: &CourseStore,
    ) -> Action {
        if self.course.is_none() {
            return Action::None;
        }

        if self.editing {
            match code {
                KeyCode::Esc => self.editing = false,
                KeyCode::Tab => {
                    self.editing = false;
                    self.next_field();
                }
                KeyCode::Backspace => {
                    self.current_field_mut().pop();
                }
                KeyCode::Char(c) => self.current_field_mut().push(c),
                _ => {}
            }
            return Action::None;
        }

        match code {
            KeyCode::Enter => self.editing = true,
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.prev_field(),
            KeyCode::Char('s') => return self.save(store),
            _ => {}
        }
        Action::None
    }

    fn save(&mut self, store: &CourseStore) -> Action {
        let Some(course) = self.course.as_mut() else {
            return Action::None;
        };

        let title = self.title.trim();
        course.metadata.title = (!title.is_empty()).then(|| title.to_string());
        let description = self.description.trim();
        course.metadata.description = (!description.is_empty()).then(|| description.to_string());
        let duration = self.duration.trim();
        course.metadata.estimated_duration =
            (!duration.is_empty()).then(|| duration.to_string());
        course.metadata.prerequisites = split_list(&self.prerequisites);
        course.metadata.outcomes = split_list(&self.outcomes);

        self.status = match store.save(course) {
            Ok(id) => format!("Saved metadata for {id}"),
            Err(e) => format!("Save failed: {e}"),
        };
        Action::Status(self.status.clone())
    }

    fn current_field_mut(&mut self) -> &mut String {
        match self.focused {
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
            Field::Duration => &mut self.duration,
            Field::Prerequisites => &mut self.prerequisites,
            Field::Outcomes => &mut self.outcomes,
        }
    }

    fn next_field(&mut self) {
        self.focused = match self.focused {
            Field::Title => Field::Description,
            Field::Description => Field::Duration,
            Field::Duration => Field::Prerequisites,
            Field::Prerequisites => Field::Outcomes,
            Field::Outcomes => Field::Title,
        };
    }

    fn prev_field(&mut self) {
        self.focused = match self.focused {
            Field::Title => Field::Outcomes,
            Field::Description => Field::Title,
            Field::Duration => Field::Description,
            Field::Prerequisites => Field::Duration,
            Field::Outcomes => Field::Prerequisites,
        };
    }
}
