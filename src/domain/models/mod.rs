mod action;
mod assistant;
mod diagnostic;
mod event;
mod message;
mod role;
mod session;
mod slash_commands;

pub use action::*;
pub use assistant::*;
pub use diagnostic::*;
pub use event::*;
pub use message::*;
pub use role::*;
pub use session::*;
pub use slash_commands::*;
