//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use coursegen_client::{ChatClient, GenerationConfig, SearchClient};
use coursegen_core::{
    CourseRequest, GenerateOutcome, ProgressReporter, Stage, generate_course,
};
use coursegen_shared::{
    AppConfig, CourseId, Difficulty, generation_api_key, init_config, load_config,
    resolve_output_dir, search_api_key,
};
use coursegen_store::CourseStore;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// CourseGen — generate structured courses with an LLM backend.
#[derive(Parser)]
#[command(
    name = "coursegen",
    version,
    about = "Generate, browse, and edit AI-generated course documents.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate a new course.
    Generate {
        /// Course topic.
        #[arg(short, long)]
        topic: String,

        /// Difficulty: beginner, intermediate, advanced, or expert.
        #[arg(short, long)]
        difficulty: Option<String>,

        /// Target audience description.
        #[arg(short, long)]
        audience: Option<String>,

        /// Learning goal (repeat for multiple goals).
        #[arg(short, long = "goal")]
        goals: Vec<String>,

        /// Enhance generation with web-search snippets.
        #[arg(long)]
        web: bool,

        /// Output directory for course documents (defaults to config).
        #[arg(short, long)]
        out: Option<String>,
    },

    /// List stored courses.
    List {
        /// Course directory (defaults to config).
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Show a stored course outline.
    Show {
        /// Course ID.
        id: String,

        /// Course directory (defaults to config).
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Export a course document to a JSON file.
    Export {
        /// Course ID.
        id: String,

        /// Destination file path.
        #[arg(long)]
        dest: String,

        /// Course directory (defaults to config).
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Delete a stored course.
    Delete {
        /// Course ID.
        id: String,

        /// Course directory (defaults to config).
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Launch the interactive TUI.
    Tui,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "coursegen=info",
        1 => "coursegen=debug",
        _ => "coursegen=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            topic,
            difficulty,
            audience,
            goals,
            web,
            out,
        } => {
            cmd_generate(
                &topic,
                difficulty.as_deref(),
                audience.as_deref(),
                goals,
                web,
                out.as_deref(),
            )
            .await
        }
        Command::List { out } => cmd_list(out.as_deref()),
        Command::Show { id, out } => cmd_show(&id, out.as_deref()),
        Command::Export { id, dest, out } => cmd_export(&id, &dest, out.as_deref()),
        Command::Delete { id, out } => cmd_delete(&id, out.as_deref()),
        Command::Tui => cmd_tui(),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

/// Open the course store for the configured or overridden directory.
fn open_store(config: &AppConfig, out: Option<&str>) -> Result<CourseStore> {
    let root = match out {
        Some(p) => PathBuf::from(p),
        None => resolve_output_dir(config)?,
    };
    Ok(CourseStore::open(root)?)
}

fn parse_course_id(id: &str) -> Result<CourseId> {
    id.parse()
        .map_err(|e| eyre!("invalid course id '{id}': {e}"))
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_generate(
    topic: &str,
    difficulty: Option<&str>,
    audience: Option<&str>,
    goals: Vec<String>,
    web: bool,
    out: Option<&str>,
) -> Result<()> {
    let config = load_config()?;

    // Fail on missing generation credentials before any network call.
    let api_key = generation_api_key(&config)?;

    let difficulty: Difficulty = difficulty
        .unwrap_or(&config.defaults.difficulty)
        .parse()
        .map_err(|e| eyre!("{e}"))?;

    let audience = audience
        .map(String::from)
        .unwrap_or_else(|| config.defaults.audience.clone());

    let goals = if goals.is_empty() {
        vec![
            "Understand core concepts and principles".to_string(),
            "Apply knowledge in practical scenarios".to_string(),
        ]
    } else {
        goals
    };

    let store = open_store(&config, out)?;

    let model = ChatClient::new(GenerationConfig {
        api_key,
        base_url: config.openai.base_url.clone(),
        model: config.openai.model.clone(),
        temperature: config.openai.temperature,
    })?;
    let search = SearchClient::new(search_api_key(&config), config.tavily.max_results);

    if web && !search.is_enabled() {
        println!("Note: no search API key configured — generating without web enhancement.");
    }

    let request = CourseRequest {
        topic: topic.to_string(),
        difficulty,
        audience,
        goals,
        web_enhanced: web,
    };

    info!(topic, %difficulty, web, "generating course");

    let reporter = CliProgress::new();
    let outcome = generate_course(&request, &model, &search, &store, &reporter).await?;

    println!();
    println!("  Course generated successfully!");
    println!("  ID:       {}", outcome.course.id);
    println!(
        "  Title:    {}",
        outcome.course.metadata.title.as_deref().unwrap_or(topic)
    );
    println!("  Modules:  {}", outcome.course.modules.len());
    println!("  Path:     {}", outcome.path.display());
    println!("  Time:     {:.1}s", outcome.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_list(out: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let store = open_store(&config, out)?;

    let summaries = store.list()?;
    if summaries.is_empty() {
        println!("No courses found in {}.", store.root().display());
        return Ok(());
    }

    println!("{:<38} {:<28} CREATED", "ID", "TOPIC");
    for summary in summaries {
        println!(
            "{:<38} {:<28} {}",
            summary.id,
            summary.topic,
            summary.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

fn cmd_show(id: &str, out: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let store = open_store(&config, out)?;
    let course = store.load(&parse_course_id(id)?)?;

    println!(
        "{}",
        course.metadata.title.as_deref().unwrap_or(&course.topic)
    );
    println!(
        "  topic: {} · difficulty: {} · audience: {}",
        course.topic, course.difficulty, course.audience
    );
    if let Some(desc) = &course.metadata.description {
        println!("  {desc}");
    }
    if !course.metadata.prerequisites.is_empty() {
        println!("  prerequisites: {}", course.metadata.prerequisites.join(", "));
    }
    if !course.metadata.outcomes.is_empty() {
        println!("  outcomes: {}", course.metadata.outcomes.join(", "));
    }

    for (i, module) in course.modules.iter().enumerate() {
        let assessed = if module.assessment.is_some() {
            "assessed"
        } else {
            "no assessment"
        };
        println!(
            "  {}. {} ({} sections, {}, {} resources)",
            i + 1,
            module.title,
            module.sections.len(),
            assessed,
            module.resources.len()
        );
        for section in &module.sections {
            println!("      - {}", section.heading);
        }
    }
    Ok(())
}

fn cmd_export(id: &str, dest: &str, out: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let store = open_store(&config, out)?;
    let id = parse_course_id(id)?;

    store.export(&id, &PathBuf::from(dest))?;
    println!("Exported {id} to {dest}");
    Ok(())
}

fn cmd_delete(id: &str, out: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let store = open_store(&config, out)?;
    let id = parse_course_id(id)?;

    store.delete(&id)?;
    println!("Deleted {id}");
    Ok(())
}

fn cmd_tui() -> Result<()> {
    // The TUI is its own binary so the CLI stays non-interactive.
    println!("Launch the interactive interface with: coursegen-tui");
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let rendered = toml::to_string_pretty(&config)?;
    println!("{rendered}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn stage(&self, stage: Stage) {
        self.spinner.set_message(stage.label().to_string());
    }

    fn module_progress(&self, current: usize, total: usize, title: &str) {
        self.spinner
            .set_message(format!("[{current}/{total}] {title}"));
    }

    fn done(&self, _outcome: &GenerateOutcome) {
        self.spinner.finish_and_clear();
    }
}
