use crate::engine::board::Board;
use crate::engine::round::{Direction, Score};
use crate::error::Result;
use crate::record::RecordStore;
use crate::tui::events::{Event, EventSource, UserInput};
use crate::tui::renderer::{Frame, Renderer};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Phase {
    Playing,
    GameOver,
}

/// Deluxe48 owns a game session: the board, the persisted record, and the
/// renderer/event-source pair it talks to the terminal through.
pub(crate) struct Deluxe48<R: Renderer, E: EventSource> {
    board: Board,
    store: RecordStore,
    record: Score,
    phase: Phase,
    renderer: R,
    event_source: E,
}

impl<R: Renderer, E: EventSource> Deluxe48<R, E> {
    pub(crate) fn new(board: Board, store: RecordStore, renderer: R, event_source: E) -> Self {
        let record = store.load();
        Self {
            board,
            store,
            record,
            phase: Phase::Playing,
            renderer,
            event_source,
        }
    }

    /// Run consumes the game and takes control of the terminal until the
    /// player quits.
    pub(crate) fn run(mut self) -> Result<()> {
        match self.inner_run() {
            Err(e) => {
                self.renderer.recover();
                Err(e)
            }
            Ok(()) => Ok(()),
        }
    }

    fn inner_run(&mut self) -> Result<()> {
        loop {
            let frame = self.frame();
            self.renderer.render(&frame)?;

            match self.event_source.next_event()? {
                Event::UserInput(input) => match (self.phase, input) {
                    (Phase::Playing, UserInput::Direction(direction)) => self.shift(direction)?,
                    (Phase::GameOver, UserInput::Restart) => self.restart(),
                    (_, UserInput::Quit) => break,
                    // everything else is a no-op in the current phase
                    _ => continue,
                },
                Event::Resize => self.renderer.clear()?,
            }
        }
        self.store.save(self.board.score())?;
        Ok(())
    }

    fn frame(&self) -> Frame {
        Frame {
            round: self.board.current(),
            record: self.record,
            game_over: self.phase == Phase::GameOver,
        }
    }

    fn shift(&mut self, direction: Direction) -> Result<()> {
        if let Some(gained) = self.board.shift(direction) {
            log::debug!(
                "shifted {:?}, gained {}, score {}",
                direction,
                gained,
                self.board.score()
            );
            if self.board.score() > self.record {
                self.record = self.board.score();
            }
        }
        if self.board.is_game_over() {
            log::info!("no moves left, round ends at {}", self.board.score());
            self.store.save(self.board.score())?;
            self.phase = Phase::GameOver;
        }
        Ok(())
    }

    fn restart(&mut self) {
        log::info!("starting a new round");
        self.board.reset();
        self.record = self.store.load();
        self.phase = Phase::Playing;
    }
}
