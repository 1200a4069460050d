use cogex_cache::{Atom, intern_ident, is_identifier};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParamError;
use crate::tokens::{clickable_targets, clicked_attributes};

/// Declares a closed set of string-valued parameter options.
macro_rules! param_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($param:literal) {
            $($variant:ident => $text:literal $(| $alias:literal)*),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const ALLOWED: &'static [&'static str] = &[$($text),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ParamError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($text $(| $alias)* => Ok($name::$variant),)+
                    other => Err(ParamError::InvalidValue {
                        param: $param,
                        value: other.to_string(),
                        allowed: Self::ALLOWED,
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = ParamError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> String {
                v.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

param_enum! {
    /// How often the mouse state is stored.
    #[derive(Serialize, Deserialize)]
    #[serde(try_from = "String", into = "String")]
    SaveMouseState ("saveMouseState") {
        Final => "final",
        OnClick => "on click",
        EveryFrame => "every frame",
        Never => "never" | "nothing",
    }
}

param_enum! {
    /// Whether a button press ends the routine.
    #[derive(Serialize, Deserialize)]
    #[serde(try_from = "LegacyFlag", into = "String")]
    ForceEndRoutine ("forceEndRoutineOnPress") {
        Never => "never",
        AnyClick => "any click",
        ValidClick => "valid click",
    }
}

param_enum! {
    /// Clock that sample times are measured against.
    #[derive(Serialize, Deserialize)]
    #[serde(try_from = "String", into = "String")]
    TimeRelativeTo ("timeRelativeTo") {
        Experiment => "experiment",
        Routine => "routine",
    }
}

param_enum! {
    #[derive(Serialize, Deserialize)]
    #[serde(try_from = "String", into = "String")]
    StartType ("startType") {
        Time => "time (s)",
        Frame => "frame N",
        Condition => "condition",
    }
}

param_enum! {
    #[derive(Serialize, Deserialize)]
    #[serde(try_from = "String", into = "String")]
    StopType ("stopType") {
        Time => "time (s)",
        Duration => "duration (s)",
        Frame => "frame N",
        DurationFrames => "duration (frames)",
        Condition => "condition",
    }
}

/// Older designs stored the end-on-press choice as a boolean.
#[derive(Deserialize)]
#[serde(untagged)]
enum LegacyFlag {
    Flag(bool),
    Text(String),
}

impl TryFrom<LegacyFlag> for ForceEndRoutine {
    type Error = ParamError;

    fn try_from(raw: LegacyFlag) -> Result<Self, Self::Error> {
        match raw {
            LegacyFlag::Flag(true) => Ok(ForceEndRoutine::AnyClick),
            LegacyFlag::Flag(false) => Ok(ForceEndRoutine::Never),
            LegacyFlag::Text(s) => s.parse(),
        }
    }
}

/// Accepts code values written as strings, numbers, booleans or null.
fn code_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Parameter set of one mouse component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MouseParams {
    pub name: String,
    pub start_type: StartType,
    #[serde(deserialize_with = "code_text")]
    pub start_val: Option<String>,
    pub stop_type: StopType,
    #[serde(deserialize_with = "code_text")]
    pub stop_val: Option<String>,
    pub save_mouse_state: SaveMouseState,
    pub force_end_routine_on_press: ForceEndRoutine,
    pub time_relative_to: TimeRelativeTo,
    pub new_clicks_only: bool,
    pub clickable: String,
    pub save_params_clickable: String,
}

impl Default for MouseParams {
    fn default() -> Self {
        Self {
            name: "mouse".to_string(),
            start_type: StartType::Time,
            start_val: Some("0.0".to_string()),
            stop_type: StopType::Duration,
            stop_val: Some("1.0".to_string()),
            save_mouse_state: SaveMouseState::Final,
            force_end_routine_on_press: ForceEndRoutine::AnyClick,
            time_relative_to: TimeRelativeTo::Routine,
            new_clicks_only: true,
            clickable: String::new(),
            save_params_clickable: "name,".to_string(),
        }
    }
}

impl MouseParams {
    pub fn named(name: &str) -> Result<Self, ParamError> {
        let params = Self {
            name: name.to_string(),
            ..Self::default()
        };
        params.validate()?;
        Ok(params)
    }

    /// Parses and validates a single component description.
    pub fn from_json(json: &str) -> Result<Self, ParamError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        if !is_identifier(&self.name) {
            return Err(ParamError::InvalidName(self.name.clone()));
        }
        Ok(())
    }

    pub fn ident(&self) -> Atom {
        intern_ident(&self.name)
    }

    /// Start value, or `None` when the component starts as soon as the routine does.
    pub fn start_value(&self) -> Option<&str> {
        self.start_val
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Stop value, or `None` when no stop condition is configured.
    pub fn stop_value(&self) -> Option<&str> {
        let val = self.stop_val.as_deref()?.trim();
        let unset = val.is_empty() || val == "None" || val.parse::<f64>() == Ok(-1.0);
        (!unset).then_some(val)
    }

    pub fn clickable_targets(&self) -> Vec<Atom> {
        clickable_targets(&self.clickable)
    }

    pub fn clicked_attributes(&self) -> Vec<Atom> {
        clicked_attributes(&self.save_params_clickable)
    }

    /// Per-sample lists are kept (every frame or on click).
    pub fn records_samples(&self) -> bool {
        matches!(
            self.save_mouse_state,
            SaveMouseState::EveryFrame | SaveMouseState::OnClick
        )
    }

    /// Button changes must be tracked to find new clicks.
    pub fn detects_clicks(&self) -> bool {
        self.save_mouse_state == SaveMouseState::OnClick
            || self.force_end_routine_on_press != ForceEndRoutine::Never
    }

    /// Anything to do while the routine runs.
    pub fn has_frame_behaviour(&self) -> bool {
        self.records_samples() || self.force_end_routine_on_press != ForceEndRoutine::Never
    }
}
