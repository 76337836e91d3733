use thiserror::Error;

/// Configuration errors raised while building a suite, before any
/// environment interaction takes place.
#[derive(Error, Debug)]
pub enum SuiteError {
    #[error("Task {name} not found in the task registry.{}", suggestion_suffix(.suggestion))]
    UnknownTask {
        name: String,
        suggestion: Option<String>,
    },

    #[error("Unsupported family: {0}")]
    UnknownFamily(String),

    #[error("Suite family is not set; please first set it.")]
    FamilyNotSet,

    #[error("Duplicate task template: {0}")]
    DuplicateTemplate(String),

    #[error("Task {template} has invalid complexity {value}; must be finite and > 0")]
    InvalidComplexity { template: String, value: f64 },

    #[error("Parameter generation failed for {template}_{index}: {source:#}")]
    Generation {
        template: String,
        index: usize,
        #[source]
        source: anyhow::Error,
    },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" Did you mean '{s}'?"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_task_message_includes_suggestion() {
        let err = SuiteError::UnknownTask {
            name: "Fooo".to_string(),
            suggestion: Some("Foo".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Task Fooo not found in the task registry. Did you mean 'Foo'?"
        );

        let err = SuiteError::UnknownTask {
            name: "Bar".to_string(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "Task Bar not found in the task registry.");
    }
}
