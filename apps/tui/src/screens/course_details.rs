//! "Course Details" screen — outline view of one course with a bar
//! chart of section counts per module.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, Paragraph};

use coursegen_shared::{Course, CourseId, Result};
use coursegen_store::CourseStore;

use super::Action;

pub(crate) struct CourseDetailsScreen {
    course: Option<Course>,
    selected_module: usize,
    status: String,
}

impl CourseDetailsScreen {
    pub(crate) fn new() -> Self {
        Self {
            course: None,
            selected_module: 0,
            status: "Open a course from the 'My Courses' tab.".to_string(),
        }
    }

    /// Load a course from the store for display.
    pub(crate) fn open(&mut self, store: &CourseStore, id: &CourseId) -> Result<()> {
        let course = store.load(id)?;
        self.selected_module = 0;
        self.status = format!(
            "{} modules · ↑/↓ select · m edit metadata · e edit module",
            course.modules.len()
        );
        self.course = Some(course);
        Ok(())
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect) {
        let Some(course) = &self.course else {
            let empty = Paragraph::new(
                "No course open.\n\nSelect one in 'My Courses' and press Enter.",
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Course Details "));
            f.render_widget(empty, area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(6),  // Header
                Constraint::Min(6),     // Module list
                Constraint::Length(8),  // Bar chart
                Constraint::Length(1),  // Status
            ])
            .split(area);

        self.draw_header(f, chunks[0], course);
        self.draw_modules(f, chunks[1], course);
        self.draw_chart(f, chunks[2], course);

        let status = Paragraph::new(self.status.as_str())
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(status, chunks[3]);
    }

    fn draw_header(&self, f: &mut Frame, area: Rect, course: &Course) {
        let title = course.metadata.title.as_deref().unwrap_or(&course.topic);
        let mut lines = vec![
            Line::from(Span::styled(
                title.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "topic: {} · difficulty: {} · audience: {}{}",
                course.topic,
                course.difficulty,
                course.audience,
                if course.web_enhanced {
                    " · web-enhanced"
                } else {
                    ""
                }
            )),
        ];
        if let Some(desc) = &course.metadata.description {
            lines.push(Line::from(desc.clone()));
        }
        if !course.metadata.prerequisites.is_empty() {
            lines.push(Line::from(format!(
                "prerequisites: {}",
                course.metadata.prerequisites.join(", ")
            )));
        }

        let header = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Overview "));
        f.render_widget(header, area);
    }

    fn draw_modules(&self, f: &mut Frame, area: Rect, course: &Course) {
        let items: Vec<ListItem> = course
            .modules
            .iter()
            .enumerate()
            .map(|(i, module)| {
                let style = if i == self.selected_module {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let prefix = if i == self.selected_module { "▸ " } else { "  " };
                let assessed = if module.assessment.is_some() {
                    "assessed"
                } else {
                    "no assessment"
                };
                ListItem::new(format!(
                    "{prefix}{}. {}  ({} sections, {}, {} resources)",
                    i + 1,
                    module.title,
                    module.sections.len(),
                    assessed,
                    module.resources.len()
                ))
                .style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Modules ({}) ", course.modules.len())),
        );
        f.render_widget(list, area);
    }

    fn draw_chart(&self, f: &mut Frame, area: Rect, course: &Course) {
        let bars: Vec<Bar> = course
            .modules
            .iter()
            .enumerate()
            .map(|(i, module)| {
                Bar::default()
                    .label(Line::from(format!("M{}", i + 1)))
                    .value(module.sections.len() as u64)
            })
            .collect();

        let chart = BarChart::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Sections per module "),
            )
            .data(BarGroup::default().bars(&bars))
            .bar_width(5)
            .bar_gap(2)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));

        f.render_widget(chart, area);
    }

    pub(crate) fn handle_key(
        &mut self,
        code: KeyCode,
        _modifiers: KeyModifiers,
        _store: &CourseStore,
    ) -> Action {
        let Some(course) = &self.course else {
            return Action::None;
        };

        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                if self.selected_module > 0 {
                    self.selected_module -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_module + 1 < course.modules.len() {
                    self.selected_module += 1;
                }
            }
            KeyCode::Char('m') => return Action::EditMetadata(course.id),
            KeyCode::Char('e') => {
                if !course.modules.is_empty() {
                    return Action::EditModule(course.id, self.selected_module);
                }
            }
            _ => {}
        }
        Action::None
    }
}
