//! The fixed generation sequence as an explicit state machine.
//!
//! Making the sequence a `Stage` enum with a transition function keeps
//! partial-failure points testable in isolation instead of leaving the
//! ordering implicit in a call chain.

use std::fmt;

/// One step of the fixed generation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Optional web-search enhancement.
    Research,
    /// Module outline (titles, descriptions, objectives).
    Planning,
    /// Sections for each outlined module.
    Content,
    /// Assessment for each module.
    Assessment,
    /// Supplementary resources for each module.
    Resources,
    /// Course-level prerequisites and outcomes.
    Metadata,
}

impl Stage {
    /// The first stage of every run.
    pub fn first() -> Self {
        Self::Research
    }

    /// The stage that follows this one, or `None` after the last.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Research => Some(Self::Planning),
            Self::Planning => Some(Self::Content),
            Self::Content => Some(Self::Assessment),
            Self::Assessment => Some(Self::Resources),
            Self::Resources => Some(Self::Metadata),
            Self::Metadata => None,
        }
    }

    /// Short name used in logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Planning => "planning",
            Self::Content => "content",
            Self::Assessment => "assessment",
            Self::Resources => "resources",
            Self::Metadata => "metadata",
        }
    }

    /// Human-readable label for progress reporting.
    pub fn label(self) -> &'static str {
        match self {
            Self::Research => "Researching topic",
            Self::Planning => "Planning course structure",
            Self::Content => "Writing module content",
            Self::Assessment => "Creating assessments",
            Self::Resources => "Gathering resources",
            Self::Metadata => "Finalizing course metadata",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_chain_covers_every_stage_once() {
        let mut seen = vec![];
        let mut stage = Some(Stage::first());
        while let Some(s) = stage {
            seen.push(s);
            stage = s.next();
        }
        assert_eq!(
            seen,
            vec![
                Stage::Research,
                Stage::Planning,
                Stage::Content,
                Stage::Assessment,
                Stage::Resources,
                Stage::Metadata,
            ]
        );
    }

    #[test]
    fn content_never_precedes_planning() {
        assert!(Stage::Planning < Stage::Content);
        assert_eq!(Stage::Planning.next(), Some(Stage::Content));
    }

    #[test]
    fn metadata_is_terminal() {
        assert_eq!(Stage::Metadata.next(), None);
    }
}
