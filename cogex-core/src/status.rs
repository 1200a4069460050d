/// Run-state of a component inside generated code, per routine repetition.
///
/// NOT_STARTED -> STARTED on entering the activation window, STARTED -> STOPPED
/// on entering the deactivation window. Generated code evaluates these
/// transitions once per frame.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentStatus {
    NotStarted,
    Started,
    Stopped,
}

impl ComponentStatus {
    /// Constant name shared by both runtimes' status namespaces.
    pub fn constant(&self) -> &'static str {
        match self {
            ComponentStatus::NotStarted => "NOT_STARTED",
            ComponentStatus::Started => "STARTED",
            ComponentStatus::Stopped => "STOPPED",
        }
    }
}
