//! Shared types, error model, and configuration for CourseGen.
//!
//! This crate is the foundation depended on by all other CourseGen crates.
//! It provides:
//! - [`CourseGenError`] — the unified error type
//! - Domain types ([`Course`], [`Module`], [`Section`], [`Assessment`], [`CourseId`])
//! - Configuration ([`AppConfig`], config loading, credential resolution)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, OpenAiConfig, TavilyConfig, config_dir, config_file_path,
    generation_api_key, init_config, load_config, load_config_from, resolve_output_dir,
    search_api_key,
};
pub use error::{CourseGenError, Result};
pub use types::{
    Assessment, Course, CourseId, CourseMetadata, CourseSummary, Difficulty, Module, Section,
};
