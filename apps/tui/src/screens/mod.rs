//! TUI screen definitions.
//!
//! Each screen corresponds to a tab in the TUI and encapsulates its
//! own state and rendering logic. Screens return an [`Action`] from
//! key handling so the app loop can route cross-screen navigation.

mod course_details;
mod create_course;
mod edit_metadata;
mod edit_module;
mod my_courses;

use std::fmt;

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;

use coursegen_shared::CourseId;
use coursegen_store::CourseStore;

/// Screen identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScreenId {
    CreateCourse,
    MyCourses,
    CourseDetails,
    EditMetadata,
    EditModule,
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateCourse => write!(f, "Create Course"),
            Self::MyCourses => write!(f, "My Courses"),
            Self::CourseDetails => write!(f, "Course Details"),
            Self::EditMetadata => write!(f, "Edit Metadata"),
            Self::EditModule => write!(f, "Edit Module"),
        }
    }
}

/// Cross-screen navigation requests produced by key handlers.
pub(crate) enum Action {
    None,
    /// Update the app status bar.
    Status(String),
    /// Open a course in the details screen.
    OpenCourse(CourseId),
    /// Open a course in the metadata editor.
    EditMetadata(CourseId),
    /// Open one module of a course in the module editor.
    EditModule(CourseId, usize),
}

/// Per-screen state and behaviour.
pub(crate) struct Screen {
    pub id: ScreenId,
    pub create: create_course::CreateCourseScreen,
    pub courses: my_courses::MyCoursesScreen,
    pub details: course_details::CourseDetailsScreen,
    pub edit_metadata: edit_metadata::EditMetadataScreen,
    pub edit_module: edit_module::EditModuleScreen,
}

impl Screen {
    pub(crate) fn new(id: ScreenId) -> Self {
        Self {
            id,
            create: create_course::CreateCourseScreen::new(),
            courses: my_courses::MyCoursesScreen::new(),
            details: course_details::CourseDetailsScreen::new(),
            edit_metadata: edit_metadata::EditMetadataScreen::new(),
            edit_module: edit_module::EditModuleScreen::new(),
        }
    }

    /// Whether the current screen has an active text input field.
    pub(crate) fn is_editing(&self) -> bool {
        match self.id {
            ScreenId::CreateCourse => self.create.is_editing(),
            ScreenId::EditMetadata => self.edit_metadata.is_editing(),
            ScreenId::EditModule => self.edit_module.is_editing(),
            _ => false,
        }
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect) {
        match self.id {
            ScreenId::CreateCourse => self.create.draw(f, area),
            ScreenId::MyCourses => self.courses.draw(f, area),
            ScreenId::CourseDetails => self.details.draw(f, area),
            ScreenId::EditMetadata => self.edit_metadata.draw(f, area),
            ScreenId::EditModule => self.edit_module.draw(f, area),
        }
    }

    pub(crate) fn handle_key(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        store: &CourseStore,
    ) -> Action {
        match self.id {
            ScreenId::CreateCourse => self.create.handle_key(code, modifiers, store),
            ScreenId::MyCourses => self.courses.handle_key(code, modifiers, store),
            ScreenId::CourseDetails => self.details.handle_key(code, modifiers, store),
            ScreenId::EditMetadata => self.edit_metadata.handle_key(code, modifiers, store),
            ScreenId::EditModule => self.edit_module.handle_key(code, modifiers, store),
        }
    }
}

/// Split a semicolon-separated input into trimmed, non-empty items.
pub(crate) fn split_list(input: &str) -> Vec<String> {
    input
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Join list items back into the semicolon-separated edit form.
pub(crate) fn join_list(items: &[String]) -> String {
    items.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_trims_and_drops_empty() {
        assert_eq!(
            split_list(" a; b ;; c "),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert!(split_list("  ;  ").is_empty());
    }

    #[test]
    fn join_then_split_is_stable() {
        let items = vec!["variables".to_string(), "control flow".to_string()];
        assert_eq!(split_list(&join_list(&items)), items);
    }
}
