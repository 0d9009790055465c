//! Course Assembler — drives the fixed multi-stage generation sequence
//! and assembles one course document.
//!
//! Stages run strictly in [`Stage`] order, each feeding context to the
//! next. A generation failure at any stage aborts the whole run and
//! nothing is written to the Content Store — there is no partial save,
//! checkpointing, or cancellation.

use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use coursegen_shared::{
    Assessment, Course, CourseGenError, CourseId, CourseMetadata, Difficulty, Module, Result,
    Section,
};
use coursegen_store::CourseStore;

use coursegen_client::prompts;

use crate::stage::Stage;

/// Search query template for the research stage.
fn research_query(topic: &str) -> String {
    format!("best practices teaching {topic} curriculum")
}

// ---------------------------------------------------------------------------
// Backend traits
// ---------------------------------------------------------------------------

/// Text-generation backend. Implemented by the chat client and by test
/// doubles.
pub trait CourseModel: Send + Sync {
    /// Send a prompt and return the parsed JSON response.
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<Value>> + Send;
}

/// Web-search backend. Soft-fail is part of the contract: implementations
/// return an empty sequence instead of erroring. How many snippets come
/// back is the backend's own configuration.
pub trait WebSearch: Send + Sync {
    /// Search and return text snippets, best effort.
    fn search(&self, query: &str) -> impl Future<Output = Vec<String>> + Send;
}

impl CourseModel for coursegen_client::ChatClient {
    async fn generate(&self, prompt: &str) -> Result<Value> {
        coursegen_client::ChatClient::generate(self, prompt).await
    }
}

impl WebSearch for coursegen_client::SearchClient {
    async fn search(&self, query: &str) -> Vec<String> {
        coursegen_client::SearchClient::search(self, query).await
    }
}

// ---------------------------------------------------------------------------
// Request / outcome
// ---------------------------------------------------------------------------

/// User inputs for one generation run.
#[derive(Debug, Clone)]
pub struct CourseRequest {
    /// Course topic.
    pub topic: String,
    /// Difficulty level.
    pub difficulty: Difficulty,
    /// Target audience description.
    pub audience: String,
    /// Ordered learning goals.
    pub goals: Vec<String>,
    /// Whether to run the research stage.
    pub web_enhanced: bool,
}

/// Result of a successful generation run.
#[derive(Debug)]
pub struct GenerateOutcome {
    /// The assembled course document, as saved.
    pub course: Course,
    /// Where the document was written.
    pub path: PathBuf,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new stage.
    fn stage(&self, stage: Stage);
    /// Per-module progress within a stage.
    fn module_progress(&self, current: usize, total: usize, title: &str);
    /// Called when the pipeline completes.
    fn done(&self, outcome: &GenerateOutcome);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn stage(&self, _stage: Stage) {}
    fn module_progress(&self, _current: usize, _total: usize, _title: &str) {}
    fn done(&self, _outcome: &GenerateOutcome) {}
}

// ---------------------------------------------------------------------------
// Stage output shapes
// ---------------------------------------------------------------------------

/// Planning stage output: the module outline.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct PlannedModule {
    /// Module title.
    pub title: String,
    /// Short description, used as prompt context for later stages.
    #[serde(default)]
    pub description: String,
    /// Learning objectives.
    #[serde(default)]
    pub objectives: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PlannedOutline {
    #[serde(default)]
    modules: Vec<PlannedModule>,
}

#[derive(Debug, Deserialize)]
struct SectionList {
    #[serde(default)]
    sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
struct ResourceList {
    #[serde(default)]
    resources: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MetadataOutput {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    prerequisites: Vec<String>,
    #[serde(default)]
    outcomes: Vec<String>,
    #[serde(default)]
    estimated_duration: Option<String>,
}

/// Deserialize a stage's JSON output, mapping schema mismatches to
/// generation errors instead of raw parse failures.
fn parse_stage<T: serde::de::DeserializeOwned>(value: Value, stage: Stage) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        CourseGenError::Generation(format!("{stage} stage returned an unexpected shape: {e}"))
    })
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the full generation sequence and save the assembled course.
///
/// 1. Research (only when requested; soft-fail)
/// 2. Planning — module outline
/// 3. Content — sections per module
/// 4. Assessment — per module
/// 5. Resources — per module
/// 6. Metadata — prerequisites and outcomes
#[instrument(skip_all, fields(topic = %request.topic, difficulty = %request.difficulty))]
pub async fn generate_course<M, W>(
    request: &CourseRequest,
    model: &M,
    search: &W,
    store: &CourseStore,
    progress: &dyn ProgressReporter,
) -> Result<GenerateOutcome>
where
    M: CourseModel,
    W: WebSearch,
{
    let start = Instant::now();

    if request.topic.trim().is_empty() {
        return Err(CourseGenError::validation("course topic must not be empty"));
    }

    // --- Stage 1: Research (optional, best effort) ---
    let mut stage = Stage::first();
    let snippets = if request.web_enhanced {
        progress.stage(stage);
        let snippets = search.search(&research_query(&request.topic)).await;
        if snippets.is_empty() {
            warn!("no research snippets available, continuing without enhancement");
        } else {
            info!(count = snippets.len(), "research snippets collected");
        }
        snippets
    } else {
        Vec::new()
    };

    // --- Stage 2: Planning ---
    stage = advance(stage);
    progress.stage(stage);
    let outline_value = model
        .generate(&prompts::planning(
            &request.topic,
            request.difficulty,
            &request.audience,
            &request.goals,
            &snippets,
        ))
        .await?;
    let outline: PlannedOutline = parse_stage(outline_value, stage)?;

    if outline.modules.is_empty() {
        return Err(CourseGenError::Generation(
            "planning stage produced no modules".into(),
        ));
    }
    info!(modules = outline.modules.len(), "outline planned");

    let total = outline.modules.len();

    // --- Stage 3: Content ---
    stage = advance(stage);
    progress.stage(stage);
    let mut modules: Vec<Module> = Vec::with_capacity(total);
    for (i, planned) in outline.modules.iter().enumerate() {
        progress.module_progress(i + 1, total, &planned.title);
        let value = model
            .generate(&prompts::module_content(
                &request.topic,
                request.difficulty,
                &request.audience,
                &planned.title,
                &planned.description,
                &planned.objectives,
            ))
            .await?;
        let content: SectionList = parse_stage(value, stage)?;

        modules.push(Module {
            title: planned.title.clone(),
            objectives: planned.objectives.clone(),
            sections: content.sections,
            assessment: None,
            resources: Vec::new(),
        });
    }

    // --- Stage 4: Assessment ---
    stage = advance(stage);
    progress.stage(stage);
    for (i, (module, planned)) in modules.iter_mut().zip(&outline.modules).enumerate() {
        progress.module_progress(i + 1, total, &module.title);
        let value = model
            .generate(&prompts::assessment(
                &request.topic,
                request.difficulty,
                &request.audience,
                &planned.title,
                &planned.objectives,
            ))
            .await?;
        let assessment: Assessment = parse_stage(value, stage)?;
        module.assessment = Some(assessment);
    }

    // --- Stage 5: Resources ---
    stage = advance(stage);
    progress.stage(stage);
    for (i, module) in modules.iter_mut().enumerate() {
        progress.module_progress(i + 1, total, &module.title);
        let value = model
            .generate(&prompts::resources(
                &request.topic,
                request.difficulty,
                &request.audience,
                &module.title,
            ))
            .await?;
        let resources: ResourceList = parse_stage(value, stage)?;
        module.resources = resources.resources;
    }

    // --- Stage 6: Metadata ---
    stage = advance(stage);
    progress.stage(stage);
    let outline_json = serde_json::to_string(&outline.modules).unwrap_or_default();
    let value = model
        .generate(&prompts::metadata(
            &request.topic,
            request.difficulty,
            &request.audience,
            &request.goals,
            &outline_json,
        ))
        .await?;
    let metadata: MetadataOutput = parse_stage(value, stage)?;
    debug_assert!(stage.next().is_none());

    // --- Assemble and save ---
    let course = Course {
        id: CourseId::new(),
        topic: request.topic.clone(),
        difficulty: request.difficulty,
        audience: request.audience.clone(),
        goals: request.goals.clone(),
        web_enhanced: request.web_enhanced && !snippets.is_empty(),
        modules,
        metadata: CourseMetadata {
            prerequisites: metadata.prerequisites,
            outcomes: metadata.outcomes,
            created_at: Utc::now(),
            title: metadata.title,
            description: metadata.description,
            estimated_duration: metadata.estimated_duration,
        },
    };

    let id = store.save(&course)?;
    let outcome = GenerateOutcome {
        path: store.course_path(&id),
        course,
        elapsed: start.elapsed(),
    };

    progress.done(&outcome);
    info!(
        course_id = %outcome.course.id,
        modules = outcome.course.modules.len(),
        elapsed_ms = outcome.elapsed.as_millis(),
        "course generation complete"
    );

    Ok(outcome)
}

/// Step the state machine. The sequence is statically known to have a next
/// stage at every call site; a mismatch is a programming error.
fn advance(stage: Stage) -> Stage {
    stage.next().unwrap_or(stage)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Classify a prompt back to its stage by its distinctive instruction.
    fn classify(prompt: &str) -> Stage {
        if prompt.contains("Design a course outline") {
            Stage::Planning
        } else if prompt.contains("Create detailed educational content") {
            Stage::Content
        } else if prompt.contains("Create assessment material") {
            Stage::Assessment
        } else if prompt.contains("Suggest supplementary resources") {
            Stage::Resources
        } else if prompt.contains("Create course-level metadata") {
            Stage::Metadata
        } else {
            panic!("unrecognized prompt: {prompt}");
        }
    }

    /// Scripted model: answers per stage, records the call order, and can
    /// be told to fail at a given stage.
    struct ScriptedModel {
        calls: Mutex<Vec<Stage>>,
        fail_at: Option<Stage>,
    }

    impl ScriptedModel {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_at: None,
            }
        }

        fn failing_at(stage: Stage) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_at: Some(stage),
            }
        }

        fn calls(&self) -> Vec<Stage> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CourseModel for ScriptedModel {
        async fn generate(&self, prompt: &str) -> Result<Value> {
            let stage = classify(prompt);
            self.calls.lock().unwrap().push(stage);

            if self.fail_at == Some(stage) {
                return Err(CourseGenError::Generation(format!(
                    "scripted failure at {stage}"
                )));
            }

            let value = match stage {
                Stage::Planning => serde_json::json!({
                    "modules": [
                        {
                            "title": "Descriptive Statistics",
                            "description": "Summarizing data numerically.",
                            "objectives": ["compute the mean", "compute the variance"]
                        },
                        {
                            "title": "Data Visualization",
                            "description": "Plots that reveal structure.",
                            "objectives": ["choose an appropriate chart"]
                        }
                    ]
                }),
                Stage::Content => serde_json::json!({
                    "sections": [
                        {
                            "heading": "Measures of Center",
                            "body": "The mean is the arithmetic average of the observations.",
                            "key_concepts": ["mean", "median"],
                            "examples": ["The mean of [1, 2, 3] is 2."]
                        }
                    ]
                }),
                Stage::Assessment => serde_json::json!({
                    "quiz": ["What is the mean of [2, 4, 6]?"],
                    "problems": ["Compute the variance of a small sample."],
                    "projects": ["Summarize a real dataset."]
                }),
                Stage::Resources => serde_json::json!({
                    "resources": ["OpenIntro Statistics, chapter 1"]
                }),
                Stage::Metadata => serde_json::json!({
                    "title": "Intro to Statistics",
                    "description": "A first course in describing data.",
                    "prerequisites": ["basic algebra"],
                    "outcomes": ["describe data numerically"],
                    "estimated_duration": "4 weeks"
                }),
                Stage::Research => unreachable!("research never reaches the model"),
            };
            Ok(value)
        }
    }

    /// Search double that records queries.
    struct FakeSearch {
        snippets: Vec<String>,
        queries: Mutex<Vec<String>>,
    }

    impl FakeSearch {
        fn with_snippets(snippets: Vec<String>) -> Self {
            Self {
                snippets,
                queries: Mutex::new(Vec::new()),
            }
        }

        fn empty() -> Self {
            Self::with_snippets(Vec::new())
        }
    }

    impl WebSearch for FakeSearch {
        async fn search(&self, query: &str) -> Vec<String> {
            self.queries.lock().unwrap().push(query.to_string());
            self.snippets.clone()
        }
    }

    fn request(web_enhanced: bool) -> CourseRequest {
        CourseRequest {
            topic: "Intro to Statistics".into(),
            difficulty: Difficulty::Beginner,
            audience: "undergraduates".into(),
            goals: vec!["understand mean/variance".into()],
            web_enhanced,
        }
    }

    #[tokio::test]
    async fn example_scenario_produces_a_complete_course() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CourseStore::open(tmp.path()).unwrap();
        let model = ScriptedModel::new();

        let outcome = generate_course(
            &request(false),
            &model,
            &FakeSearch::empty(),
            &store,
            &SilentProgress,
        )
        .await
        .unwrap();

        let course = &outcome.course;
        assert!(!course.modules.is_empty());
        for module in &course.modules {
            assert!(!module.sections.is_empty());
            assert!(module.assessment.is_some());
        }
        assert_eq!(course.metadata.prerequisites, vec!["basic algebra"]);
        assert!(!course.web_enhanced);

        // Saved document round-trips exactly.
        let loaded = store.load(&course.id).unwrap();
        assert_eq!(&loaded, course);
    }

    #[tokio::test]
    async fn stages_run_in_fixed_order() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CourseStore::open(tmp.path()).unwrap();
        let model = ScriptedModel::new();

        generate_course(
            &request(false),
            &model,
            &FakeSearch::empty(),
            &store,
            &SilentProgress,
        )
        .await
        .unwrap();

        let calls = model.calls();
        assert_eq!(calls[0], Stage::Planning);

        // No content call before planning, and no assessment before the
        // last content call.
        let first_content = calls.iter().position(|s| *s == Stage::Content).unwrap();
        let last_content = calls.iter().rposition(|s| *s == Stage::Content).unwrap();
        let first_assessment = calls.iter().position(|s| *s == Stage::Assessment).unwrap();
        assert!(first_content > 0);
        assert!(first_assessment > last_content);
        assert_eq!(*calls.last().unwrap(), Stage::Metadata);
    }

    #[tokio::test]
    async fn planning_failure_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CourseStore::open(tmp.path()).unwrap();
        let model = ScriptedModel::failing_at(Stage::Planning);

        let err = generate_course(
            &request(false),
            &model,
            &FakeSearch::empty(),
            &store,
            &SilentProgress,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CourseGenError::Generation(_)));
        assert!(store.list().unwrap().is_empty());
        // The failed stage is the only model call made.
        assert_eq!(model.calls(), vec![Stage::Planning]);
    }

    #[tokio::test]
    async fn content_failure_discards_partial_modules() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CourseStore::open(tmp.path()).unwrap();
        let model = ScriptedModel::failing_at(Stage::Content);

        let err = generate_course(
            &request(false),
            &model,
            &FakeSearch::empty(),
            &store,
            &SilentProgress,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CourseGenError::Generation(_)));
        assert!(store.list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_search_still_completes_all_stages() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CourseStore::open(tmp.path()).unwrap();
        let model = ScriptedModel::new();
        let search = FakeSearch::empty();

        let outcome = generate_course(&request(true), &model, &search, &store, &SilentProgress)
            .await
            .unwrap();

        // Search was consulted, found nothing, and the run still finished.
        assert_eq!(search.queries.lock().unwrap().len(), 1);
        assert_eq!(*model.calls().last().unwrap(), Stage::Metadata);
        assert!(!outcome.course.web_enhanced);
    }

    #[tokio::test]
    async fn research_snippets_flow_into_planning() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CourseStore::open(tmp.path()).unwrap();

        /// Model that asserts the planning prompt carries the snippet.
        struct SnippetCheckingModel {
            inner: ScriptedModel,
        }

        impl CourseModel for SnippetCheckingModel {
            async fn generate(&self, prompt: &str) -> Result<Value> {
                if classify(prompt) == Stage::Planning {
                    assert!(prompt.contains("start from real datasets"));
                }
                self.inner.generate(prompt).await
            }
        }

        let model = SnippetCheckingModel {
            inner: ScriptedModel::new(),
        };
        let search = FakeSearch::with_snippets(vec!["start from real datasets".into()]);

        let outcome = generate_course(&request(true), &model, &search, &store, &SilentProgress)
            .await
            .unwrap();

        assert!(outcome.course.web_enhanced);
        assert!(
            search.queries.lock().unwrap()[0].contains("Intro to Statistics"),
            "research query should mention the topic"
        );
    }

    #[tokio::test]
    async fn empty_topic_is_rejected_before_any_call() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CourseStore::open(tmp.path()).unwrap();
        let model = ScriptedModel::new();

        let mut req = request(false);
        req.topic = "   ".into();

        let err = generate_course(&req, &model, &FakeSearch::empty(), &store, &SilentProgress)
            .await
            .unwrap_err();

        assert!(matches!(err, CourseGenError::Validation { .. }));
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn malformed_stage_output_is_a_generation_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CourseStore::open(tmp.path()).unwrap();

        /// Planning answers with the wrong shape.
        struct WrongShapeModel;

        impl CourseModel for WrongShapeModel {
            async fn generate(&self, _prompt: &str) -> Result<Value> {
                Ok(serde_json::json!({ "modules": "not an array" }))
            }
        }

        let err = generate_course(
            &request(false),
            &WrongShapeModel,
            &FakeSearch::empty(),
            &store,
            &SilentProgress,
        )
        .await
        .unwrap_err();

        match err {
            CourseGenError::Generation(msg) => assert!(msg.contains("planning")),
            other => panic!("expected generation error, got {other:?}"),
        }
        assert!(store.list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_outline_is_a_generation_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CourseStore::open(tmp.path()).unwrap();

        struct EmptyOutlineModel;

        impl CourseModel for EmptyOutlineModel {
            async fn generate(&self, _prompt: &str) -> Result<Value> {
                Ok(serde_json::json!({ "modules": [] }))
            }
        }

        let err = generate_course(
            &request(false),
            &EmptyOutlineModel,
            &FakeSearch::empty(),
            &store,
            &SilentProgress,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CourseGenError::Generation(_)));
    }
}
