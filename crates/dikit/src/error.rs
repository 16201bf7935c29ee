//! Error types for dependency resolution

use thiserror::Error;

/// Errors that can occur while registering or resolving dependencies
#[derive(Debug, Error)]
pub enum DIError {
    /// Neither a live cached instance nor a factory exists for the key
    #[error(
        "No dependency found for type \"{type_name}\", tag {tag:?} in scope {scope:?}"
    )]
    UnregisteredDependency {
        type_name: &'static str,
        tag: Option<String>,
        scope: Option<String>,
    },

    /// A stored factory or cached instance does not produce the requested type
    #[error("Type mismatch for \"{type_name}\" at key {key}")]
    TypeMismatch { type_name: &'static str, key: String },

    #[error("The process-wide container has already been initialized")]
    GlobalAlreadyInitialized,

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl DIError {
    /// Create an unregistered dependency error
    pub fn unregistered(type_name: &'static str, tag: Option<&str>, scope: Option<&str>) -> Self {
        Self::UnregisteredDependency {
            type_name,
            tag: tag.map(str::to_owned),
            scope: scope.map(str::to_owned),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(type_name: &'static str, key: impl ToString) -> Self {
        Self::TypeMismatch {
            type_name,
            key: key.to_string(),
        }
    }

    /// Whether this error reports a wiring defect (missing or mistyped provider)
    pub fn is_wiring_defect(&self) -> bool {
        matches!(
            self,
            Self::UnregisteredDependency { .. } | Self::TypeMismatch { .. }
        )
    }
}

pub type DIResult<T> = Result<T, DIError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DIError::unregistered("app::Foo", Some("1"), None);
        assert_eq!(
            err.to_string(),
            "No dependency found for type \"app::Foo\", tag Some(\"1\") in scope None"
        );

        let err = DIError::type_mismatch("app::Foo", "main/app::Foo@1");
        assert_eq!(
            err.to_string(),
            "Type mismatch for \"app::Foo\" at key main/app::Foo@1"
        );

        let err = DIError::GlobalAlreadyInitialized;
        assert_eq!(
            err.to_string(),
            "The process-wide container has already been initialized"
        );
    }

    #[test]
    fn test_wiring_defects() {
        assert!(DIError::unregistered("Foo", None, None).is_wiring_defect());
        assert!(DIError::type_mismatch("Foo", "Foo").is_wiring_defect());
        assert!(!DIError::GlobalAlreadyInitialized.is_wiring_defect());
    }
}
