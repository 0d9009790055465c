//! Prompt templates for the fixed generation sequence.
//!
//! Each stage gets one builder returning the full prompt text. Format
//! instructions pin the exact JSON shape the assembler deserializes, so
//! validation failures map cleanly to generation errors.

use coursegen_shared::Difficulty;

/// Render goals as a bulleted list for prompt context.
fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|g| format!("- {g}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Research snippets rendered as an optional context block.
fn insights_section(snippets: &[String]) -> String {
    if snippets.is_empty() {
        String::new()
    } else {
        format!(
            "\nExpert insights from web research:\n{}\n",
            bullet_list(snippets)
        )
    }
}

/// Planning stage: produce the module outline.
pub fn planning(
    topic: &str,
    difficulty: Difficulty,
    audience: &str,
    goals: &[String],
    snippets: &[String],
) -> String {
    format!(
        r#"You are an expert course designer with a background in instructional design and curriculum development.

Design a course outline on: {topic}
Difficulty level: {difficulty}
Target audience: {audience}
Learning goals:
{goals}
{insights}
Propose 3-6 well-structured modules that together fulfill the learning goals.
Each module needs a clear title, a concise description, and 2-5 specific learning objectives.

Return ONLY a JSON object with this exact structure, no other text:
{{"modules": [{{"title": "...", "description": "...", "objectives": ["...", "..."]}}]}}"#,
        goals = bullet_list(goals),
        insights = insights_section(snippets),
    )
}

/// Content stage: generate the sections of one module.
pub fn module_content(
    topic: &str,
    difficulty: Difficulty,
    audience: &str,
    module_title: &str,
    module_description: &str,
    objectives: &[String],
) -> String {
    format!(
        r#"Create detailed educational content for one module of a course about {topic}.

Module title: {module_title}
Module description: {module_description}
Learning objectives:
{objectives}
Difficulty level: {difficulty}
Target audience: {audience}

Write 3-6 sections. Each section needs a descriptive heading, substantial body text
with explanations and background, a list of key concepts, and 1-3 worked examples.

Return ONLY a JSON object with this exact structure, no other text:
{{"sections": [{{"heading": "...", "body": "...", "key_concepts": ["..."], "examples": ["..."]}}]}}"#,
        objectives = bullet_list(objectives),
    )
}

/// Assessment stage: quiz items, practice problems, and project ideas for one module.
pub fn assessment(
    topic: &str,
    difficulty: Difficulty,
    audience: &str,
    module_title: &str,
    objectives: &[String],
) -> String {
    format!(
        r#"Create assessment material for the module "{module_title}" in a course about {topic}.

Learning objectives:
{objectives}
Difficulty level: {difficulty}
Target audience: {audience}

Produce 4-8 quiz questions, 2-4 practice problems with enough context to solve them,
and 1-3 project ideas, each as self-contained text.

Return ONLY a JSON object with this exact structure, no other text:
{{"quiz": ["..."], "problems": ["..."], "projects": ["..."]}}"#,
        objectives = bullet_list(objectives),
    )
}

/// Resources stage: readings, tools, and glossary entries for one module.
pub fn resources(
    topic: &str,
    difficulty: Difficulty,
    audience: &str,
    module_title: &str,
) -> String {
    format!(
        r#"Suggest supplementary resources for the module "{module_title}" in a course about {topic}.

Difficulty level: {difficulty}
Target audience: {audience}

Include recommended readings (author and title), useful tools, and short glossary
entries, each as one self-contained text entry. Aim for 5-10 entries total.

Return ONLY a JSON object with this exact structure, no other text:
{{"resources": ["..."]}}"#,
    )
}

/// Metadata stage: prerequisites and outcomes summarizing the whole course.
pub fn metadata(
    topic: &str,
    difficulty: Difficulty,
    audience: &str,
    goals: &[String],
    outline_json: &str,
) -> String {
    format!(
        r#"Create course-level metadata for a course on {topic}.

Difficulty level: {difficulty}
Target audience: {audience}
Learning goals:
{goals}

Course outline:
{outline_json}

Return ONLY a JSON object with this exact structure, no other text:
{{"title": "...", "description": "...", "prerequisites": ["..."], "outcomes": ["..."], "estimated_duration": "..."}}"#,
        goals = bullet_list(goals),
    )
}

/// Repair round: ask the model to fix a malformed JSON response.
pub fn json_repair(broken: &str) -> String {
    format!(
        r#"The following text was supposed to be valid JSON but is not. Repair it.

{broken}

Return ONLY the corrected JSON, with no other text."#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planning_includes_inputs() {
        let prompt = planning(
            "Intro to Statistics",
            Difficulty::Beginner,
            "undergraduates",
            &["understand mean/variance".into()],
            &[],
        );
        assert!(prompt.contains("Intro to Statistics"));
        assert!(prompt.contains("beginner"));
        assert!(prompt.contains("- understand mean/variance"));
        assert!(!prompt.contains("Expert insights"));
    }

    #[test]
    fn planning_appends_research_snippets() {
        let prompt = planning(
            "Rust",
            Difficulty::Advanced,
            "engineers",
            &["write unsafe code safely".into()],
            &["start with ownership".into()],
        );
        assert!(prompt.contains("Expert insights from web research"));
        assert!(prompt.contains("- start with ownership"));
    }

    #[test]
    fn stage_prompts_pin_their_schemas() {
        let content = module_content("t", Difficulty::Beginner, "a", "m", "d", &[]);
        assert!(content.contains(r#""sections""#));
        assert!(content.contains(r#""key_concepts""#));

        let assess = assessment("t", Difficulty::Beginner, "a", "m", &[]);
        assert!(assess.contains(r#""quiz""#));
        assert!(assess.contains(r#""projects""#));

        let res = resources("t", Difficulty::Beginner, "a", "m");
        assert!(res.contains(r#""resources""#));

        let meta = metadata("t", Difficulty::Beginner, "a", &[], "{}");
        assert!(meta.contains(r#""prerequisites""#));
        assert!(meta.contains(r#""outcomes""#));
    }
}
