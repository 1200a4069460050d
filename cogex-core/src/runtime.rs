use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Runtime a generated script is meant to execute in
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetRuntime {
    /// Procedural desktop scripting runtime (PsychoPy).
    Desktop,
    /// Browser runtime (PsychoJS).
    Browser,
}

impl TargetRuntime {
    pub const ALL: [TargetRuntime; 2] = [TargetRuntime::Desktop, TargetRuntime::Browser];

    pub fn file_extension(&self) -> &'static str {
        match self {
            TargetRuntime::Desktop => "py",
            TargetRuntime::Browser => "js",
        }
    }
}

impl fmt::Display for TargetRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TargetRuntime::Desktop => "desktop",
            TargetRuntime::Browser => "browser",
        })
    }
}

impl FromStr for TargetRuntime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" | "psychopy" | "py" => Ok(TargetRuntime::Desktop),
            "browser" | "psychojs" | "js" => Ok(TargetRuntime::Browser),
            other => Err(format!("unknown target runtime '{other}'")),
        }
    }
}
