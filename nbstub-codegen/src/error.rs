use nbstub_model::{ModelError, ObjectId};
use thiserror::Error;

/// Result type for stub generation.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal stub generation errors.
///
/// Anything that can be recovered locally (an unrenderable value, a name
/// collision, a cycle) never surfaces here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not locate default argument {index} in signature `{template}`")]
    MissingDefaultMarker { index: usize, template: String },

    #[error("default argument {index} of `{template}` renders as multiple lines")]
    MultilineDefault { index: usize, template: String },

    #[error("no free alias for `{name}` imported from `{module}` after {attempts} attempts")]
    AliasExhausted {
        module: String,
        name: String,
        attempts: usize,
    },

    #[error("object {0} is not a module")]
    NotAModule(ObjectId),

    #[error("the stub for this module was already generated")]
    AlreadyGenerated,

    #[error("invalid python version '{0}', expected MAJOR.MINOR")]
    InvalidPythonVersion(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("invalid regular expression")]
    Regex(#[from] regex::Error),
}
