//! "Create Course" screen — topic, difficulty, audience, goals, and
//! the generation action.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use tokio::runtime::Runtime;

use coursegen_client::{ChatClient, GenerationConfig, SearchClient};
use coursegen_core::{CourseRequest, SilentProgress, generate_course};
use coursegen_shared::{AppConfig, Difficulty, generation_api_key, load_config, search_api_key};
use coursegen_store::CourseStore;

use super::{Action, split_list};

/// Which input field is focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Topic,
    Difficulty,
    Audience,
    Goals,
    Web,
}

pub(crate) struct CreateCourseScreen {
    topic: String,
    difficulty: Difficulty,
    audience: String,
    /// Semicolon-separated learning goals.
    goals: String,
    web: bool,
    focused: Field,
    editing: bool,
    status: String,
}

impl CreateCourseScreen {
    pub(crate) fn new() -> Self {
        Self::from_config(&load_config().unwrap_or_default())
    }

    /// Seed the form from the `[defaults]` config section, matching what
    /// the CLI uses when flags are omitted.
    fn from_config(config: &AppConfig) -> Self {
        let difficulty = config
            .defaults
            .difficulty
            .parse()
            .unwrap_or(Difficulty::Intermediate);

        Self {
            topic: String::new(),
            difficulty,
            audience: config.defaults.audience.clone(),
            goals: String::new(),
            web: false,
            focused: Field::Topic,
            editing: false,
            status: "Enter a topic and press 'g' to generate.".to_string(),
        }
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Topic
                Constraint::Length(3), // Difficulty
                Constraint::Length(3), // Audience
                Constraint::Length(3), // Goals
                Constraint::Length(3), // Web toggle
                Constraint::Length(1), // Action hint
                Constraint::Min(1),    // Status
            ])
            .split(area);

        self.draw_text_field(f, chunks[0], Field::Topic, " Topic ", &self.topic);

        let diff_style = self.border_style(Field::Difficulty);
        let diff = Paragraph::new(format!("< {} >  (← → to change)", self.difficulty)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Difficulty ")
                .border_style(diff_style),
        );
        f.render_widget(diff, chunks[1]);

        self.draw_text_field(f, chunks[2], Field::Audience, " Audience ", &self.audience);
        self.draw_text_field(
            f,
            chunks[3],
            Field::Goals,
            " Goals (separate with ';') ",
            &self.goals,
        );

        let web_style = self.border_style(Field::Web);
        let web = Paragraph::new(format!(
            "[{}] enhance with web search  (Space to toggle)",
            if self.web { "x" } else { " " }
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Web enhancement ")
                .border_style(web_style),
        );
        f.render_widget(web, chunks[4]);

        let hint = if self.editing {
            "Type to edit · Esc to stop editing · Tab to next field"
        } else {
            "Enter to edit · Tab to next field · g to generate"
        };
        let hint_p = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(hint_p, chunks[5]);

        let status_text = Paragraph::new(self.status.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Status "),
        );
        f.render_widget(status_text, chunks[6]);
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

    fn draw_text_field(&self, f: &mut Frame, area: Rect, field: Field, title: &str, value: &str) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(self.border_style(field));
        f.render_widget(Paragraph::new(value).block(block), area);
    }

    pub(crate) fn handle_key(
        &mut self,
        code: KeyCode,
        _modifiers: KeyModifiers,
        store: &CourseStore,
    ) -> Action {
        if self.editing {
            match code {
                KeyCode::Esc => self.editing = false,
                KeyCode::Tab => {
                    self.editing = false;
                    self.next_field();
                }
                KeyCode::Backspace => {
                    if let Some(field) = self.current_field_mut() {
                        field.pop();
                    }
                }
                KeyCode::Char(c) => {
                    if let Some(field) = self.current_field_mut() {
                        field.push(c);
                    }
                }
                _ => {}
            }
            return Action::None;
        }

        match code {
            KeyCode::Enter => match self.focused {
                Field::Difficulty => self.cycle_difficulty(),
                Field::Web => self.web = !self.web,
                _ => self.editing = true,
            },
            KeyCode::Char(' ') if self.focused == Field::Web => self.web = !self.web,
            KeyCode::Left if self.focused == Field::Difficulty => self.cycle_difficulty_back(),
            KeyCode::Right if self.focused == Field::Difficulty => self.cycle_difficulty(),
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.prev_field(),
            KeyCode::Char('g') => return self.generate(store),
            _ => {}
        }
        Action::None
    }

    /// Run the full generation pipeline. Blocks the UI until the course
    /// is generated and stored; progress is not streamed.
    fn generate(&mut self, store: &CourseStore) -> Action {
        let topic = self.topic.trim().to_string();
        if topic.is_empty() {
            self.status = "A topic is required.".to_string();
            return Action::Status(self.status.clone());
        }

        let config = match load_config() {
            Ok(c) => c,
            Err(e) => {
                self.status = format!("Config error: {e}");
                return Action::Status(self.status.clone());
            }
        };
        let api_key = match generation_api_key(&config) {
            Ok(k) => k,
            Err(e) => {
                self.status = format!("{e}");
                return Action::Status(self.status.clone());
            }
        };

        let model = match ChatClient::new(GenerationConfig {
            api_key,
            base_url: config.openai.base_url.clone(),
            model: config.openai.model.clone(),
            temperature: config.openai.temperature,
        }) {
            Ok(m) => m,
            Err(e) => {
                self.status = format!("{e}");
                return Action::Status(self.status.clone());
            }
        };
        let search = SearchClient::new(search_api_key(&config), config.tavily.max_results);

        let goals = if self.goals.trim().is_empty() {
            vec![
                "Understand core concepts and principles".to_string(),
                "Apply knowledge in practical scenarios".to_string(),
            ]
        } else {
            split_list(&self.goals)
        };

        let request = CourseRequest {
            topic,
            difficulty: self.difficulty,
            audience: self.audience.trim().to_string(),
            goals,
            web_enhanced: self.web,
        };

        self.status = "Generating... this may take a few minutes.".to_string();
        tracing::info!(topic = %request.topic, web = request.web_enhanced, "generating course");

        let runtime = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                self.status = format!("Runtime error: {e}");
                return Action::Status(self.status.clone());
            }
        };

        let result = runtime.block_on(generate_course(
            &request,
            &model,
            &search,
            store,
            &SilentProgress,
        ));

        match result {
            Ok(outcome) => {
                self.status = format!(
                    "Generated {} modules in {:.1}s.",
                    outcome.course.modules.len(),
                    outcome.elapsed.as_secs_f64()
                );
                Action::OpenCourse(outcome.course.id)
            }
            Err(e) => {
                self.status = format!("Generation failed: {e}");
                Action::Status(self.status.clone())
            }
        }
    }

    fn current_field_mut(&mut self) -> Option<&mut String> {
        match self.focused {
            Field::Topic => Some(&mut self.topic),
            Field::Audience => Some(&mut self.audience),
            Field::Goals => Some(&mut self.goals),
            Field::Difficulty | Field::Web => None,
        }
    }

    fn next_field(&mut self) {
        self.focused = match self.focused {
            Field::Topic => Field::Difficulty,
            Field::Difficulty => Field::Audience,
            Field::Audience => Field::Goals,
            Field::Goals => Field::Web,
            Field::Web => Field::Topic,
        };
    }

    fn prev_field(&mut self) {
        self.focused = match self.focused {
            Field::Topic => Field::Web,
            Field::Difficulty => Field::Topic,
            Field::Audience => Field::Difficulty,
            Field::Goals => Field::Audience,
            Field::Web => Field::Goals,
        };
    }

    fn cycle_difficulty(&mut self) {
        self.difficulty = match self.difficulty {
            Difficulty::Beginner => Difficulty::Intermediate,
            Difficulty::Intermediate => Difficulty::Advanced,
            Difficulty::Advanced => Difficulty::Expert,
            Difficulty::Expert => Difficulty::Beginner,
        };
    }

    fn cycle_difficulty_back(&mut self) {
        self.difficulty = match self.difficulty {
            Difficulty::Beginner => Difficulty::Expert,
            Difficulty::Intermediate => Difficulty::Beginner,
            Difficulty::Advanced => Difficulty::Intermediate,
            Difficulty::Expert => Difficulty::Advanced,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_seeds_from_config_defaults() {
        let mut config = AppConfig::default();
        config.defaults.difficulty = "advanced".into();
        config.defaults.audience = "field biologists".into();

        let screen = CreateCourseScreen::from_config(&config);
        assert_eq!(screen.difficulty, Difficulty::Advanced);
        assert_eq!(screen.audience, "field biologists");
        assert!(screen.topic.is_empty());
    }

    #[test]
    fn unknown_configured_difficulty_falls_back() {
        let mut config = AppConfig::default();
        config.defaults.difficulty = "impossible".into();

        let screen = CreateCourseScreen::from_config(&config);
        assert_eq!(screen.difficulty, Difficulty::Intermediate);
    }
}
