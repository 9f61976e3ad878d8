/// Out of band feedback for the presentation layer. Transcript changes are
/// not events, they are published as snapshots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Notice(String),
    Warning(String),
}
