pub mod phase;
pub mod runtime;
pub mod status;

pub use phase::{EmitPhase, Phase};
pub use runtime::TargetRuntime;
pub use status::ComponentStatus;
