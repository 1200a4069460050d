use serde::{Deserialize, Serialize};
use std::fmt;

use crate::params::TimeRelativeTo;

/// Kind of data handler that collects a routine's records
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoopKind {
    TrialHandler,
    StairHandler,
    MultiStairHandler,
    ExperimentHandler,
}

impl LoopKind {
    /// Staircases judge each trial by a correct/incorrect answer, which mouse
    /// data cannot supply.
    pub fn is_staircase(&self) -> bool {
        matches!(self, LoopKind::StairHandler)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoopKind::TrialHandler => "TrialHandler",
            LoopKind::StairHandler => "StairHandler",
            LoopKind::MultiStairHandler => "MultiStairHandler",
            LoopKind::ExperimentHandler => "ExperimentHandler",
        }
    }
}

impl fmt::Display for LoopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopContext {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LoopKind,
}

impl LoopContext {
    pub fn new(name: impl Into<String>, kind: LoopKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// What a component may know about the routine it is compiled into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineContext {
    pub name: String,
    #[serde(default = "default_experiment_clock")]
    pub experiment_clock: String,
    /// Defaults to `<name>Clock`.
    #[serde(default)]
    pub routine_clock: Option<String>,
    #[serde(default = "default_experiment_handler")]
    pub experiment_handler: String,
    /// Enclosing loops, outermost first.
    #[serde(default)]
    pub loops: Vec<LoopContext>,
}

fn default_experiment_clock() -> String {
    "globalClock".to_string()
}

fn default_experiment_handler() -> String {
    "thisExp".to_string()
}

impl RoutineContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            experiment_clock: default_experiment_clock(),
            routine_clock: None,
            experiment_handler: default_experiment_handler(),
            loops: Vec::new(),
        }
    }

    pub fn with_loop(mut self, name: impl Into<String>, kind: LoopKind) -> Self {
        self.loops.push(LoopContext::new(name, kind));
        self
    }

    pub fn routine_clock(&self) -> String {
        self.routine_clock
            .clone()
            .unwrap_or_else(|| format!("{}Clock", self.name))
    }

    pub fn clock(&self, relative_to: TimeRelativeTo) -> String {
        match relative_to {
            TimeRelativeTo::Experiment => self.experiment_clock.clone(),
            TimeRelativeTo::Routine => self.routine_clock(),
        }
    }

    /// Nearest handler that will receive this routine's data: the innermost
    /// loop, or the experiment handler outside any loop.
    pub fn data_handler(&self) -> LoopContext {
        self.loops.last().cloned().unwrap_or_else(|| {
            LoopContext::new(self.experiment_handler.clone(), LoopKind::ExperimentHandler)
        })
    }

    /// The handler writes rows itself only when it is the experiment handler.
    pub fn is_experiment_level(&self, handler: &LoopContext) -> bool {
        handler.name == self.experiment_handler
    }
}
