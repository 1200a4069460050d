use thiserror::Error;

/// Construction-time failures of a component parameter set.
///
/// Emission itself never fails; anything that would make it ill-formed is
/// rejected here.
#[derive(Debug, Error)]
pub enum ParamError {
    #[error("invalid value '{value}' for {param} (allowed: {})", .allowed.join(", "))]
    InvalidValue {
        param: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("'{0}' is not a valid component name")]
    InvalidName(String),

    #[error("malformed parameter document: {0}")]
    Json(#[from] serde_json::Error),
}
