pub mod actions;
mod diagnostics;
mod session_controller;
mod transcript;
mod transcript_view;

pub use diagnostics::*;
pub use session_controller::*;
pub use transcript::*;
pub use transcript_view::*;
