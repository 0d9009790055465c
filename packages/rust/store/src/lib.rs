//! Content Store — course documents as JSON files on local disk.
//!
//! One file per course, `course_<id>.json` under the store root. Writes are
//! atomic at single-file granularity (temp file + rename). No locking:
//! single-user, single-process usage assumed.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use coursegen_shared::{Course, CourseGenError, CourseId, CourseSummary, Result};

/// File-backed store for course documents.
pub struct CourseStore {
    root: PathBuf,
}

impl CourseStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| CourseGenError::io(&root, e))?;
        Ok(Self { root })
    }

    /// Store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document for `id`.
    pub fn course_path(&self, id: &CourseId) -> PathBuf {
        self.root.join(format!("course_{id}.json"))
    }

    /// Write the full course document. Returns the course identifier.
    ///
    /// The write is temp-file + rename so a crash mid-write never leaves a
    /// truncated document behind.
    pub fn save(&self, course: &Course) -> Result<CourseId> {
        let target = self.course_path(&course.id);
        let temp = self.root.join(format!(".course_{}.json.tmp", course.id));

        let json = serde_json::to_string_pretty(course)
            .map_err(|e| CourseGenError::Storage(format!("serialization failed: {e}")))?;

        std::fs::write(&temp, json).map_err(|e| {
            CourseGenError::Storage(format!("cannot write {}: {e}", temp.display()))
        })?;
        std::fs::rename(&temp, &target).map_err(|e| {
            CourseGenError::Storage(format!("cannot write {}: {e}", target.display()))
        })?;

        debug!(id = %course.id, path = %target.display(), "course saved");
        Ok(course.id)
    }

    /// Load the course document for `id`.
    pub fn load(&self, id: &CourseId) -> Result<Course> {
        let path = self.course_path(id);

        if !path.exists() {
            return Err(CourseGenError::NotFound(id.to_string()));
        }

        let content =
            std::fs::read_to_string(&path).map_err(|e| CourseGenError::io(&path, e))?;

        serde_json::from_str(&content).map_err(|e| {
            CourseGenError::parse(format!("invalid course document {}: {e}", path.display()))
        })
    }

    /// List stored courses for the course picker, newest first.
    ///
    /// Unreadable or malformed entries are skipped with a warning rather
    /// than failing the whole listing.
    pub fn list(&self) -> Result<Vec<CourseSummary>> {
        let entries =
            std::fs::read_dir(&self.root).map_err(|e| CourseGenError::io(&self.root, e))?;

        let mut summaries = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.starts_with("course_") || !name.ends_with(".json") {
                continue;
            }

            match std::fs::read_to_string(&path)
                .map_err(|e| CourseGenError::io(&path, e))
                .and_then(|content| {
                    serde_json::from_str::<Course>(&content)
                        .map_err(|e| CourseGenError::parse(e.to_string()))
                }) {
                Ok(course) => summaries.push(CourseSummary {
                    id: course.id,
                    topic: course.topic,
                    created_at: course.metadata.created_at,
                }),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable course file");
                }
            }
        }

        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    /// Remove the stored document for `id`.
    pub fn delete(&self, id: &CourseId) -> Result<()> {
        let path = self.course_path(id);
        if !path.exists() {
            return Err(CourseGenError::NotFound(id.to_string()));
        }
        std::fs::remove_file(&path).map_err(|e| CourseGenError::io(&path, e))?;
        debug!(%id, "course deleted");
        Ok(())
    }

    /// Copy the document for `id` to `dest` (the export action).
    pub fn export(&self, id: &CourseId, dest: &Path) -> Result<()> {
        // Load first so a schema-invalid document fails with a parse error
        // instead of exporting garbage.
        let course = self.load(id)?;

        let json = serde_json::to_string_pretty(&course)
            .map_err(|e| CourseGenError::Storage(format!("serialization failed: {e}")))?;
        std::fs::write(dest, json).map_err(|e| {
            CourseGenError::Storage(format!("cannot write {}: {e}", dest.display()))
        })?;

        debug!(%id, dest = %dest.display(), "course exported");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use coursegen_shared::{Assessment, CourseMetadata, Difficulty, Module, Section};

    fn sample_course() -> Course {
        Course {
            id: CourseId::new(),
            topic: "Intro to Statistics".into(),
            difficulty: Difficulty::Beginner,
            audience: "undergraduates".into(),
            goals: vec!["understand mean/variance".into()],
            web_enhanced: false,
            modules: vec![
                Module {
                    title: "Descriptive Statistics".into(),
                    objectives: vec!["compute the mean".into()],
                    sections: vec![Section {
                        heading: "Measures of Center".into(),
                        body: "The mean is...".into(),
                        key_concepts: vec!["mean".into()],
                        examples: vec!["mean of [1,2,3] is 2".into()],
                    }],
                    assessment: Some(Assessment {
                        quiz: vec!["q1".into()],
                        problems: vec!["p1".into()],
                        projects: vec!["pr1".into()],
                    }),
                    resources: vec!["OpenIntro, ch. 1".into()],
                },
                Module {
                    title: "Variance".into(),
                    objectives: vec![],
                    sections: vec![],
                    assessment: None,
                    resources: vec![],
                },
            ],
            metadata: CourseMetadata {
                prerequisites: vec!["basic algebra".into()],
                outcomes: vec!["describe data".into()],
                created_at: Utc::now(),
                title: None,
                description: None,
                estimated_duration: None,
            },
        }
    }

    #[test]
    fn save_load_roundtrip_preserves_everything() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CourseStore::open(tmp.path()).unwrap();

        let course = sample_course();
        let id = store.save(&course).unwrap();
        let loaded = store.load(&id).unwrap();

        assert_eq!(loaded, course);
        // Module order is display order.
        assert_eq!(loaded.modules[0].title, "Descriptive Statistics");
        assert_eq!(loaded.modules[1].title, "Variance");
    }

    #[test]
    fn repeated_save_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CourseStore::open(tmp.path()).unwrap();

        let mut course = sample_course();
        course.audience = "graduate students".into();

        store.save(&course).unwrap();
        let first = std::fs::read_to_string(store.course_path(&course.id)).unwrap();
        store.save(&course).unwrap();
        let second = std::fs::read_to_string(store.course_path(&course.id)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn edits_keep_the_identifier_stable() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CourseStore::open(tmp.path()).unwrap();

        let course = sample_course();
        let id = store.save(&course).unwrap();

        let mut edited = store.load(&id).unwrap();
        edited.metadata.outcomes.push("new outcome".into());
        let saved_id = store.save(&edited).unwrap();

        assert_eq!(saved_id, id);
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn load_missing_course_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CourseStore::open(tmp.path()).unwrap();

        let err = store.load(&CourseId::new()).unwrap_err();
        assert!(matches!(err, CourseGenError::NotFound(_)));
    }

    #[test]
    fn load_corrupt_document_is_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CourseStore::open(tmp.path()).unwrap();

        let id = CourseId::new();
        std::fs::write(store.course_path(&id), "{\"id\": \"not a course\"").unwrap();

        let err = store.load(&id).unwrap_err();
        assert!(matches!(err, CourseGenError::Parse { .. }));
    }

    #[test]
    fn list_returns_summaries_newest_first() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CourseStore::open(tmp.path()).unwrap();

        let mut older = sample_course();
        older.topic = "Older".into();
        older.metadata.created_at = Utc::now() - chrono::Duration::hours(1);
        let mut newer = sample_course();
        newer.id = CourseId::new();
        newer.topic = "Newer".into();

        store.save(&older).unwrap();
        store.save(&newer).unwrap();

        let summaries = store.list().unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].topic, "Newer");
        assert_eq!(summaries[1].topic, "Older");
    }

    #[test]
    fn list_skips_malformed_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CourseStore::open(tmp.path()).unwrap();

        store.save(&sample_course()).unwrap();
        std::fs::write(tmp.path().join("course_bogus.json"), "not json").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

        let summaries = store.list().unwrap();
        assert_eq!(summaries.len(), 1);
    }

    #[test]
    fn delete_removes_the_document() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CourseStore::open(tmp.path()).unwrap();

        let course = sample_course();
        let id = store.save(&course).unwrap();
        store.delete(&id).unwrap();

        assert!(matches!(
            store.load(&id).unwrap_err(),
            CourseGenError::NotFound(_)
        ));
        assert!(matches!(
            store.delete(&id).unwrap_err(),
            CourseGenError::NotFound(_)
        ));
    }

    #[test]
    fn export_writes_an_equal_document() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CourseStore::open(tmp.path().join("store")).unwrap();

        let course = sample_course();
        let id = store.save(&course).unwrap();

        let dest = tmp.path().join("exported.json");
        store.export(&id, &dest).unwrap();

        let exported: Course =
            serde_json::from_str(&std::fs::read_to_string(&dest).unwrap()).unwrap();
        assert_eq!(exported, course);
    }
}
