use crate::ClassId;

pub type Result<T> = std::result::Result<T, TypeError>;

/// Errors produced while building or loading type metadata.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("{class} declares {expected} type parameters but {found} type arguments were supplied")]
    ArityMismatch {
        class: String,
        expected: usize,
        found: usize,
    },

    #[error("unknown class {0:?}")]
    UnknownClass(ClassId),

    #[error("type store snapshot is missing well-known class {name}")]
    MissingWellKnown { name: &'static str },

    #[error("json error: {message}")]
    Json { message: String },
}

impl From<serde_json::Error> for TypeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            message: err.to_string(),
        }
    }
}
