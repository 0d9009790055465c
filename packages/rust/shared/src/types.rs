//! Core domain types for CourseGen course documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// CourseId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for course identifiers (time-sortable).
///
/// Identifiers are stable for the lifetime of a course document —
/// edit operations never change them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub Uuid);

impl CourseId {
    /// Generate a new time-sortable course identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for CourseId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CourseId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// Course difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    /// Wire/prompt representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            "expert" => Ok(Self::Expert),
            other => Err(format!(
                "unknown difficulty '{other}' (expected beginner, intermediate, advanced, or expert)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Course document
// ---------------------------------------------------------------------------

/// The persisted course document — one JSON file per course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique identifier for this course.
    pub id: CourseId,
    /// Course topic as entered by the user.
    pub topic: String,
    /// Difficulty level.
    pub difficulty: Difficulty,
    /// Target audience description.
    pub audience: String,
    /// Ordered learning goals.
    pub goals: Vec<String>,
    /// Whether web-search enhancement was used during generation.
    pub web_enhanced: bool,
    /// Ordered modules. Sequence order is display order and must survive
    /// save/load round-trips.
    pub modules: Vec<Module>,
    /// Course-level metadata.
    pub metadata: CourseMetadata,
}

/// A module within a course, identified by its position in the sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Module title.
    pub title: String,
    /// Ordered learning objectives.
    pub objectives: Vec<String>,
    /// Ordered sections.
    pub sections: Vec<Section>,
    /// Module assessment, if generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment: Option<Assessment>,
    /// Supplementary resource entries (readings, tools, glossary items).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
}

/// A content section within a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section heading.
    pub heading: String,
    /// Body text.
    pub body: String,
    /// Key concepts covered in this section.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_concepts: Vec<String>,
    /// Ordered worked examples.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// Assessment material for a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Quiz items.
    #[serde(default)]
    pub quiz: Vec<String>,
    /// Practice problems.
    #[serde(default)]
    pub problems: Vec<String>,
    /// Project ideas.
    #[serde(default)]
    pub projects: Vec<String>,
}

/// Course-level metadata produced by the final generation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseMetadata {
    /// Prerequisites for taking the course.
    pub prerequisites: Vec<String>,
    /// Learning outcomes for the whole course.
    pub outcomes: Vec<String>,
    /// When the course was generated.
    pub created_at: DateTime<Utc>,
    /// Generated course title, if the metadata stage produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Generated course description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Estimated completion time (free text, e.g. "6 weeks").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,
}

// ---------------------------------------------------------------------------
// CourseSummary
// ---------------------------------------------------------------------------

/// One row of the course picker — derived from a stored document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSummary {
    /// Course identifier.
    pub id: CourseId,
    /// Course topic.
    pub topic: String,
    /// Generation timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_course() -> Course {
        Course {
            id: CourseId::new(),
            topic: "Intro to Statistics".into(),
            difficulty: Difficulty::Beginner,
            audience: "undergraduates".into(),
            goals: vec!["understand mean/variance".into()],
            web_enhanced: false,
            modules: vec![Module {
                title: "Descriptive Statistics".into(),
                objectives: vec!["compute the mean".into(), "compute the variance".into()],
                sections: vec![Section {
                    heading: "Measures of Center".into(),
                    body: "The mean is the arithmetic average...".into(),
                    key_concepts: vec!["mean".into(), "median".into()],
                    examples: vec!["Average of [1, 2, 3] is 2.".into()],
                }],
                assessment: Some(Assessment {
                    quiz: vec!["What is the mean of [2, 4, 6]?".into()],
                    problems: vec!["Compute variance of a small sample.".into()],
                    projects: vec!["Summarize a real dataset.".into()],
                }),
                resources: vec!["OpenIntro Statistics, chapter 1".into()],
            }],
            metadata: CourseMetadata {
                prerequisites: vec!["basic algebra".into()],
                outcomes: vec!["describe data numerically".into()],
                created_at: Utc::now(),
                title: Some("Intro to Statistics".into()),
                description: None,
                estimated_duration: Some("4 weeks".into()),
            },
        }
    }

    #[test]
    fn course_id_roundtrip() {
        let id = CourseId::new();
        let s = id.to_string();
        let parsed: CourseId = s.parse().expect("parse CourseId");
        assert_eq!(id, parsed);
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("Beginner".parse::<Difficulty>().unwrap(), Difficulty::Beginner);
        assert_eq!("EXPERT".parse::<Difficulty>().unwrap(), Difficulty::Expert);
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        let json = serde_json::to_string(&Difficulty::Advanced).unwrap();
        assert_eq!(json, r#""advanced""#);
    }

    #[test]
    fn course_serialization_roundtrip() {
        let course = sample_course();
        let json = serde_json::to_string_pretty(&course).expect("serialize");
        let parsed: Course = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, course);
    }

    #[test]
    fn module_order_survives_roundtrip() {
        let mut course = sample_course();
        course.modules = (0..5)
            .map(|i| Module {
                title: format!("Module {i}"),
                objectives: vec![],
                sections: vec![],
                assessment: None,
                resources: vec![],
            })
            .collect();

        let json = serde_json::to_string(&course).unwrap();
        let parsed: Course = serde_json::from_str(&json).unwrap();
        let titles: Vec<_> = parsed.modules.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Module 0", "Module 1", "Module 2", "Module 3", "Module 4"]
        );
    }

    #[test]
    fn document_uses_stable_field_names() {
        let course = sample_course();
        let value = serde_json::to_value(&course).unwrap();
        for field in [
            "id",
            "topic",
            "difficulty",
            "audience",
            "goals",
            "web_enhanced",
            "modules",
            "metadata",
        ] {
            assert!(value.get(field).is_some(), "missing field {field}");
        }
        let module = &value["modules"][0];
        for field in ["title", "objectives", "sections", "assessment", "resources"] {
            assert!(module.get(field).is_some(), "missing module field {field}");
        }
        let assessment = &module["assessment"];
        for field in ["quiz", "problems", "projects"] {
            assert!(assessment.get(field).is_some(), "missing assessment field {field}");
        }
    }
}
