pub mod controller;
pub mod result;
pub mod state;
pub mod timer;

pub use controller::{SessionController, SessionEvent, SubmitOutcome, Timing};
pub use result::SessionResult;
pub use state::{Choice, Feedback, Phase, SessionState};
