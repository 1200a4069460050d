pub mod context;
pub mod error;
pub mod params;
pub mod tokens;

pub use context::{LoopContext, LoopKind, RoutineContext};
pub use error::ParamError;
pub use params::{ForceEndRoutine, MouseParams, SaveMouseState, StartType, StopType, TimeRelativeTo};
pub use tokens::{clickable_targets, clicked_attributes};
