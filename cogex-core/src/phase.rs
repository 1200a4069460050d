/// Defines the passes a routine compiler makes over its components
pub trait Phase: Copy + Clone + PartialEq + Send + Sync + std::fmt::Debug + Default {
    fn next(&self) -> Option<Self>;

    /// Code for this pass lives inside the routine body, not at script level.
    fn is_routine_scoped(&self) -> bool {
        false
    }
}

#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum EmitPhase {
    #[default]
    Declare,
    RoutineStart,
    EachFrame,
    RoutineEnd,
}

impl EmitPhase {
    pub const ALL: [EmitPhase; 4] = [
        EmitPhase::Declare,
        EmitPhase::RoutineStart,
        EmitPhase::EachFrame,
        EmitPhase::RoutineEnd,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EmitPhase::Declare => "declare",
            EmitPhase::RoutineStart => "routine-start",
            EmitPhase::EachFrame => "each-frame",
            EmitPhase::RoutineEnd => "routine-end",
        }
    }
}

impl Phase for EmitPhase {
    fn next(&self) -> Option<Self> {
        use EmitPhase::*;
        Some(match self {
            Declare => RoutineStart,
            RoutineStart => EachFrame,
            EachFrame => RoutineEnd,
            RoutineEnd => return None,
        })
    }

    fn is_routine_scoped(&self) -> bool {
        matches!(self, EmitPhase::EachFrame | EmitPhase::RoutineEnd)
    }
}
