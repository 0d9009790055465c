//! "Edit Module" screen — title, objectives, and per-section content
//! of one module.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use coursegen_shared::{Course, CourseId, Result};
use coursegen_store::CourseStore;

use super::{Action, join_list, split_list};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Objectives,
    SectionHeading,
    SectionBody,
}

pub(crate) struct EditModuleScreen {
    course: Option<Course>,
    module_index: usize,
    section_index: usize,
    title: String,
    /// Semicolon-separated module objectives.
    objectives: String,
    section_heading: String,
    section_body: String,
    focused: Field,
    editing: bool,
    status: String,
}

impl EditModuleScreen {
    pub(crate) fn new() -> Self {
        Self {
            course: None,
            module_index: 0,
            section_index: 0,
            title: String::new(),
            objectives: String::new(),
            section_heading: String::new(),
            section_body: String::new(),
            focused: Field::Title,
            editing: false,
            status: "Open a module from the details screen ('e').".to_string(),
        }
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing
    }

    /// Load one module of a course into the edit fields.
    pub(crate) fn open(
        &mut self,
        store: &CourseStore,
        id: &CourseId,
        module_index: usize,
    ) -> Result<()> {
        let course = store.load(id)?;
        let module = course.modules.get(module_index).ok_or_else(|| {
            coursegen_shared::CourseGenError::validation(format!(
                "course has no module {}",
                module_index + 1
            ))
        })?;

        self.title = module.title.clone();
        self.objectives = join_list(&module.objectives);
        self.module_index = module_index;
        self.section_index = 0;
        self.focused = Field::Title;
        self.editing = false;
        self.status = "Enter to edit · ←/→ change section · s to save".to_string();
        self.course = Some(course);
        self.load_section();
        Ok(())
    }

    /// Copy the selected section into the edit buffers.
    fn load_section(&mut self) {
        let Some(course) = &self.course else { return };
        let section = course
            .modules
            .get(self.module_index)
            .and_then(|m| m.sections.get(self.section_index));
        match section {
            Some(s) => {
                self.section_heading = s.heading.clone();
                self.section_body = s.body.clone();
            }
            None => {
                self.section_heading.clear();
                self.section_body.clear();
            }
        }
    }

    /// Write the edit buffers back into the selected section.
    fn store_section(&mut self) {
        let module_index = self.module_index;
        let section_index = self.section_index;
        let heading = self.section_heading.clone();
        let body = self.section_body.clone();
        if let Some(section) = self
            .course
            .as_mut()
            .and_then(|c| c.modules.get_mut(module_index))
            .and_then(|m| m.sections.get_mut(section_index))
        {
            section.heading = heading;
            section.body = body;
        }
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect) {
        let Some(course) = &self.course else {
            let empty = Paragraph::new(
                "No module open for editing.\n\nOpen one from 'Course Details' with 'e'.",
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Edit Module "));
            f.render_widget(empty, area);
            return;
        };

        let section_count = course
            .modules
            .get(self.module_index)
            .map(|m| m.sections.len())
            .unwrap_or(0);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Objectives
                Constraint::Length(3), // Section heading
                Constraint::Min(4),    // Section body
                Constraint::Length(1), // Hint
                Constraint::Length(3), // Status
            ])
            .split(area);

        self.draw_field(
            f,
            chunks[0],
            Field::Title,
            format!(" Module {} title ", self.module_index + 1),
            &self.title,
        );
        self.draw_field(
            f,
            chunks[1],
            Field::Objectives,
            " Objectives (separate with ';') ".to_string(),
            &self.objectives,
        );
        self.draw_field(
            f,
            chunks[2],
            Field::SectionHeading,
            format!(
                " Section {}/{} heading (←/→ to switch) ",
                self.section_index + 1,
                section_count.max(1)
            ),
            &self.section_heading,
        );

        let body_style = self.border_style(Field::SectionBody);
        let body = Paragraph::new(self.section_body.as_str())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Section content ")
                    .border_style(body_style),
            );
        f.render_widget(body, chunks[3]);

        let hint = if self.editing {
            "Type to edit · Esc to stop editing · Tab to next field"
        } else {
            "Enter to edit · Tab next field · ←/→ switch section · s to save"
        };
        let hint_p = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(hint_p, chunks[4]);

        let status = Paragraph::new(self.status.as_str())
            .block(Block::default().borders(Borders::ALL).title(" Status "));
        f.render_widget(status, chunks[5]);
    }

    fn border_style(&self, field: Field) -> Style {
        if self.focused == field && self.editing {
            Style::default().fg(Color::Yellow)
        } else if self.focused == field {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        }
    }

    fn draw_field(&self, f: &mut Frame, area: Rect, field: Field, title: String, value: &str) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(self.border_style(field));
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
                KeyCode::Enter if self.focused == Field::SectionBody => {
                    self.section_body.push('\n');
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
            KeyCode::Left => self.switch_section(false),
            KeyCode::Right => self.switch_section(true),
            KeyCode::Char('s') => return self.save(store),
            _ => {}
        }
        Action::None
    }

    fn switch_section(&mut self, forward: bool) {
        let Some(course) = &self.course else { return };
        let count = course
            .modules
            .get(self.module_index)
            .map(|m| m.sections.len())
            .unwrap_or(0);
        if count == 0 {
            return;
        }

        // Keep pending heading/body edits when switching sections.
        self.store_section();
        self.section_index = if forward {
            (self.section_index + 1) % count
        } else {
            (self.section_index + count - 1) % count
        };
        self.load_section();
    }

    fn save(&mut self, store: &CourseStore) -> Action {
        self.store_section();

        let module_index = self.module_index;
        let title = self.title.trim().to_string();
        let objectives = split_list(&self.objectives);

        let Some(course) = self.course.as_mut() else {
            return Action::None;
        };
        let Some(module) = course.modules.get_mut(module_index) else {
            return Action::None;
        };

        if title.is_empty() {
            self.status = "Module title must not be empty.".to_string();
            return Action::Status(self.status.clone());
        }
        module.title = title;
        module.objectives = objectives;

        self.status = match store.save(course) {
            Ok(id) => format!("Saved module {} of {id}", module_index + 1),
            Err(e) => format!("Save failed: {e}"),
        };
        Action::Status(self.status.clone())
    }

    fn current_field_mut(&mut self) -> &mut String {
        match self.focused {
            Field::Title => &mut self.title,
            Field::Objectives => &mut self.objectives,
            Field::SectionHeading => &mut self.section_heading,
            Field::SectionBody => &mut self.section_body,
        }
    }

    fn next_field(&mut self) {
        self.focused = match self.focused {
            Field::Title => Field::Objectives,
            Field::Objectives => Field::SectionHeading,
            Field::SectionHeading => Field::SectionBody,
            Field::SectionBody => Field::Title,
        };
    }

    fn prev_field(&mut self) {
        self.focused = match self.focused {
            Field::Title => Field::SectionBody,
            Field::Objectives => Field::Title,
            Field::SectionHeading => Field::Objectives,
            Field::SectionBody => Field::SectionHeading,
        };
    }
}
