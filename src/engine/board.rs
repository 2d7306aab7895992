use rand::RngCore;

use super::round::{Direction, Round, Score};

/// Board represents a 2048 board that keeps track of the history of its game
/// states.
pub(crate) struct Board {
    rng: Box<dyn RngCore>,
    rounds: Vec<Round>,
}

impl Board {
    /// Initialize a new board using the given random number generator.
    pub(crate) fn new(mut rng: impl RngCore + 'static) -> Self {
        let mut rounds = Vec::with_capacity(2000);
        rounds.push(Round::random(&mut rng));
        Self {
            rng: Box::new(rng),
            rounds,
        }
    }

    pub(crate) fn score(&self) -> Score {
        self.rounds.last().map_or(0, |r| r.score())
    }

    /// Attempt to shift the board in the given direction; returns the score
    /// gained if anything changed.
    pub(crate) fn shift(&mut self, direction: Direction) -> Option<Score> {
        let prev = self
            .rounds
            .last()
            .expect("there should always be a previous round");
        let mut round = prev.clone();
        let gained = round.shift(&mut self.rng, direction);

        if gained.is_some() {
            self.rounds.push(round);
        }
        gained
    }

    pub(crate) fn current(&self) -> Round {
        self.rounds
            .last()
            .expect("a board must always have at least one round")
            .clone()
    }

    pub(crate) fn is_game_over(&self) -> bool {
        !self
            .rounds
            .last()
            .expect("a board must always have at least one round")
            .has_moves()
    }

    /// Discard the current game and start over with a fresh round.
    pub(crate) fn reset(&mut self) {
        self.rounds.clear();
        let round = Round::random(&mut self.rng);
        self.rounds.push(round);
    }

    #[cfg(test)]
    pub(crate) fn set_initial_round(&mut self, round: Round) {
        let mut v = Vec::with_capacity(1);
        v.push(round);
        self.rounds = v;
    }
}
