//! Full-screen media viewer: per-view media lists, launch-time index
//! resolution, and the gesture/timer driven session state machine.

mod actions;
pub mod gesture;
mod launcher;
mod registry;
mod session;
mod timer;

pub use actions::{ActionRequest, ViewerAction};
pub use api_client::{MediaKind, MediaRecord};
pub use gesture::{interpret, GestureTracker, SwipeIntent, SWIPE_THRESHOLD};
pub use launcher::{resolve, CandidateSource, Resolution, ViewerLauncher};
pub use registry::{MediaContext, MediaListRegistry};
pub use session::{Affordances, SessionState, ViewerConfig, ViewerSession, HIDE_AFTER};
pub use timer::HideElapsed;
