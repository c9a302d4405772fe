use nova_types::{ClassId, TypeError};

pub type Result<T> = std::result::Result<T, ResolveError>;

/// Failures of a resolution call.
///
/// An unbound type variable is not a failure; it is reported as
/// [`Resolution::Unresolved`](crate::Resolution::Unresolved).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("{class} declares {expected} type parameters but {found} type arguments were supplied")]
    StructuralMismatch {
        class: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid field declaration: {reason}")]
    InvalidDeclaration { reason: String },

    #[error("unknown class {0:?}")]
    UnknownClass(ClassId),

    #[error("{class} has no field named `{field}`")]
    UnknownField { class: String, field: String },

    #[error("{declaring} is not a superclass of {context}")]
    NotInHierarchy { declaring: String, context: String },

    #[error("cyclic superclass chain through {class}")]
    CyclicHierarchy { class: String },
}

impl ResolveError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidDeclaration {
            reason: reason.into(),
        }
    }
}

impl From<TypeError> for ResolveError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::ArityMismatch {
                class,
                expected,
                found,
            } => Self::StructuralMismatch {
                class,
                expected,
                found,
            },
            TypeError::UnknownClass(id) => Self::UnknownClass(id),
            other => Self::invalid(other.to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse toml config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid logging level `{0}`")]
    InvalidLogLevel(String),
}
