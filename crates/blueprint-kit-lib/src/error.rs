use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the blueprint-kit library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a plan string is empty after trimming.
    #[error("plan string is empty")]
    EmptyPlanString,

    /// Raised when a plan string starts with an unknown version character.
    #[error("unsupported plan string version '{version}'")]
    UnsupportedPlanVersion { version: char },

    /// Raised when the base64 body of a plan string is malformed.
    #[error("plan string is not valid base64: {source}")]
    PlanBase64 {
        #[source]
        source: base64::DecodeError,
    },

    /// Raised when compressing or decompressing a plan payload fails.
    #[error("plan payload could not be (de)compressed: {source}")]
    PlanCompression {
        #[source]
        source: std::io::Error,
    },

    /// Raised when a plan payload is not a well-formed plan JSON document.
    #[error("invalid plan JSON: {source}")]
    PlanJson {
        #[source]
        source: serde_json::Error,
    },

    /// Raised when the JSON half of a catalog export cannot be parsed.
    #[error("invalid catalog JSON: {source}")]
    CatalogJson {
        #[source]
        source: serde_json::Error,
    },

    /// Raised when a logistic container declares a mode outside the known set.
    #[error("unknown logistic_mode '{mode}' for {container}")]
    UnknownLogisticMode { container: String, mode: String },

    /// Raised when a settings file cannot be parsed.
    #[error("invalid settings in {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Raised when the configured inserter is absent from the catalog.
    #[error("inserter {name} not found{}", format_suggestions(.suggestions))]
    InserterNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when the configured outserter is absent from the catalog.
    #[error("outserter {name} not found{}", format_suggestions(.suggestions))]
    OutserterNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when the configured source (requester) chest is absent from the catalog.
    #[error("source chest {name} not found{}", format_suggestions(.suggestions))]
    SourceChestNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when the configured target (provider) chest is absent from the catalog.
    #[error("target chest {name} not found{}", format_suggestions(.suggestions))]
    TargetChestNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a recipe references a category the catalog does not know.
    #[error("category {category} not found for recipe {recipe}")]
    CategoryNotFound { category: String, recipe: String },

    /// Raised when the selected machine for a category cannot be resolved.
    #[error("selected machine '{machine}' not found for category {category}")]
    MachineNotFound { machine: String, category: String },

    /// Raised when a selected recipe name is absent from the catalog.
    #[error("unknown recipe: {name}{}", format_suggestions(.suggestions))]
    UnknownRecipe {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a block cannot be placed inside the u32 tile grid.
    #[error("block for recipe {recipe} does not fit in the blueprint coordinate range")]
    LayoutOverflow { recipe: String },

    /// Raised when a signal group capacity of zero is requested.
    #[error("signal capacity must be at least 1")]
    InvalidSignalCapacity,

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Rank `candidates` by similarity to `name` and keep the closest few.
pub(crate) fn suggest<'a, I>(name: &str, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    const LIMIT: usize = 3;
    const THRESHOLD: f64 = 0.8;

    let mut scored: Vec<(f64, &str)> = candidates
        .into_iter()
        .map(|candidate| (strsim::jaro_winkler(name, candidate), candidate))
        .filter(|(score, _)| *score >= THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(LIMIT)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestions_are_ranked_and_rendered() {
        let suggestions = suggest("fast-inserte", ["fast-inserter", "bulk-inserter", "pipe"]);
        assert_eq!(suggestions.first().map(String::as_str), Some("fast-inserter"));
        assert!(!suggestions.contains(&"pipe".to_string()));

        let err = Error::InserterNotFound {
            name: "fast-inserte".to_string(),
            suggestions: vec!["fast-inserter".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "inserter fast-inserte not found. Did you mean 'fast-inserter'?"
        );
    }

    #[test]
    fn no_suggestions_render_bare_message() {
        let err = Error::UnknownRecipe {
            name: "unobtainium".to_string(),
            suggestions: Vec::new(),
        };
        assert_eq!(err.to_string(), "unknown recipe: unobtainium");
    }
}
