use crate::engine::round::{Round, Score};
use crate::error::Result;

/// Frame is an immutable snapshot of everything a single render displays.
#[derive(Clone)]
pub(crate) struct Frame {
    pub(crate) round: Round,
    pub(crate) record: Score,
    pub(crate) game_over: bool,
}

impl Frame {
    pub(crate) fn score(&self) -> Score {
        self.round.score()
    }
}

pub(crate) trait Renderer {
    fn render(&mut self, frame: &Frame) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
    /// Give the terminal back to the shell; called on the error path before
    /// the failure is reported.
    fn recover(&mut self);
}
