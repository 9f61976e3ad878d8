/// Intents the presentation layer dispatches to the session controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Clear(),
    History(),
    Submit(String),
}
