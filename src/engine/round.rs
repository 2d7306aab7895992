use rand::seq::IteratorRandom;
use rand::Rng;

pub(crate) type Card = u16;

pub(crate) type Score = u32;

pub(crate) const GRID: usize = 4;

pub(crate) type Slots = [[Card; GRID]; GRID];

const NEW_CARD_CHOICES: [Card; 2] = [2, 4];

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) struct Idx(pub(crate) usize, pub(crate) usize);

/// Direction represents the direction indicated by the player input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    // Quarter-turn counts that bring this direction into the canonical
    // "shift left" orientation and back out again.
    fn rotations(&self) -> (usize, usize) {
        match self {
            Direction::Left => (0, 0),
            Direction::Right => (2, 2),
            Direction::Up => (3, 1),
            Direction::Down => (1, 3),
        }
    }
}

/// Slide all cards of a row toward the left end, eliminating empty gaps
/// while preserving their order.
fn compress(row: [Card; GRID]) -> [Card; GRID] {
    let mut compressed = [0; GRID];
    let mut slot = 0;
    for card in row.into_iter().filter(|c| *c != 0) {
        compressed[slot] = card;
        slot += 1;
    }
    compressed
}

/// Combine equal adjacent pairs in a single left-to-right pass, leaving a
/// gap where the right partner used to be. A card produced by a merge is
/// never re-compared against its right neighbor, so [2,2,2,2] becomes
/// [4,0,4,0] rather than [8,0,0,0].
fn merge(mut row: [Card; GRID]) -> ([Card; GRID], Score) {
    let mut gained = 0;
    for i in 0..GRID - 1 {
        if row[i] != 0 && row[i] == row[i + 1] {
            row[i] *= 2;
            row[i + 1] = 0;
            gained += Score::from(row[i]);
        }
    }
    (row, gained)
}

fn shift_row(row: [Card; GRID]) -> ([Card; GRID], Score) {
    let (merged, gained) = merge(compress(row));
    (compress(merged), gained)
}

/// Rotate the grid one quarter turn clockwise. Four applications are the
/// identity.
fn rotate(slots: Slots) -> Slots {
    let mut rotated = [[0; GRID]; GRID];
    for (y, row) in slots.iter().enumerate() {
        for (x, card) in row.iter().enumerate() {
            rotated[x][GRID - 1 - y] = *card;
        }
    }
    rotated
}

fn rotate_n(slots: Slots, turns: usize) -> Slots {
    (0..turns).fold(slots, |slots, _| rotate(slots))
}

/// Shift every row of the grid in the given direction, combining equal
/// adjacent pairs. Returns the resulting grid and the score gained; the
/// caller can detect a no-op move by comparing the result against its
/// input.
pub(crate) fn shifted(slots: &Slots, direction: Direction) -> (Slots, Score) {
    let (pre, post) = direction.rotations();
    let mut rotated = rotate_n(*slots, pre);
    let mut gained = 0;
    for row in rotated.iter_mut() {
        let (shifted_row, row_gained) = shift_row(*row);
        *row = shifted_row;
        gained += row_gained;
    }
    (rotate_n(rotated, post), gained)
}

/// Round holds the grid and score of a single game round.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Round {
    slots: Slots,
    score: Score,
}

// public methods
impl Round {
    pub(crate) fn score(&self) -> Score {
        self.score
    }

    /// Initialize a fresh round with two spawned cards.
    pub(crate) fn random<T: Rng>(rng: &mut T) -> Self {
        let mut round = Round::default();
        round.spawn(rng);
        round.spawn(rng);
        round
    }

    pub(crate) fn get(&self, idx: &Idx) -> Card {
        self.slots[idx.1][idx.0]
    }

    /// Shift the round in the given direction. When anything moves or
    /// merges, a new card is spawned and the score gained by the shift is
    /// returned; a shift that changes nothing leaves the round untouched
    /// and spawns nothing.
    pub(crate) fn shift<T: Rng>(&mut self, rng: &mut T, direction: Direction) -> Option<Score> {
        let (next, gained) = shifted(&self.slots, direction);
        if next == self.slots {
            return None;
        }
        self.slots = next;
        self.score += gained;
        self.spawn(rng);
        Some(gained)
    }

    /// True while at least one legal move remains: an empty cell or an
    /// adjacent equal pair in either orientation.
    pub(crate) fn has_moves(&self) -> bool {
        for y in 0..GRID {
            for x in 0..GRID {
                if self.slots[y][x] == 0 {
                    return true;
                }
                if x + 1 < GRID && self.slots[y][x] == self.slots[y][x + 1] {
                    return true;
                }
                if y + 1 < GRID && self.slots[y][x] == self.slots[y + 1][x] {
                    return true;
                }
            }
        }
        false
    }
}

// private methods
impl Round {
    /// Place a 2 or a 4 in an empty cell, both picked uniformly. Does
    /// nothing when the grid is full.
    fn spawn<T: Rng>(&mut self, rng: &mut T) -> Option<Idx> {
        let idx = self.empty_cells().choose(rng)?;
        let card = NEW_CARD_CHOICES[rng.gen_range(0..NEW_CARD_CHOICES.len())];
        self.slots[idx.1][idx.0] = card;
        Some(idx)
    }

    fn empty_cells(&self) -> impl Iterator<Item = Idx> + '_ {
        (0..GRID)
            .flat_map(|y| (0..GRID).map(move |x| Idx(x, y)))
            .filter(|idx| self.get(idx) == 0)
    }

    #[cfg(test)]
    pub(crate) fn from_parts(slots: Slots, score: Score) -> Self {
        Round { slots, score }
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use rstest::*;

    use super::*;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    fn count_cards(round: &Round) -> usize {
        (0..GRID)
            .flat_map(|y| (0..GRID).map(move |x| round.get(&Idx(x, y))))
            .filter(|c| *c != 0)
            .count()
    }

    #[rstest]
    #[case::all_empty([0, 0, 0, 0], [0, 0, 0, 0])]
    #[case::already_packed([2, 4, 8, 16], [2, 4, 8, 16])]
    #[case::gaps_in_the_middle([0, 2, 0, 4], [2, 4, 0, 0])]
    #[case::single_trailing([0, 0, 0, 2], [2, 0, 0, 0])]
    #[case::order_preserved([8, 0, 2, 4], [8, 2, 4, 0])]
    fn compress(#[case] row: [Card; GRID], #[case] expected: [Card; GRID]) {
        assert_eq!(super::compress(row), expected);
    }

    #[rstest]
    #[case::all_empty([0, 0, 0, 0], [0, 0, 0, 0], 0)]
    #[case::no_pairs([2, 4, 2, 4], [2, 4, 2, 4], 0)]
    #[case::single_pair([2, 2, 4, 8], [4, 0, 4, 8], 4)]
    #[case::pair_merges_once([2, 2, 2, 0], [4, 0, 2, 0], 4)]
    #[case::no_cascading([2, 2, 2, 2], [4, 0, 4, 0], 8)]
    #[case::later_pair([4, 2, 2, 0], [4, 4, 0, 0], 4)]
    fn merge(#[case] row: [Card; GRID], #[case] expected: [Card; GRID], #[case] gained: Score) {
        assert_eq!(super::merge(row), (expected, gained));
    }

    #[rstest]
    #[case::simple_pair([2, 2, 0, 0], [4, 0, 0, 0], 4)]
    #[case::pair_split_by_gap([2, 0, 2, 2], [4, 2, 0, 0], 4)]
    #[case::two_pairs([2, 2, 2, 2], [4, 4, 0, 0], 8)]
    #[case::unequal_neighbors([2, 4, 8, 16], [2, 4, 8, 16], 0)]
    #[case::gap_then_merge([0, 4, 0, 4], [8, 0, 0, 0], 8)]
    fn shift_row(#[case] row: [Card; GRID], #[case] expected: [Card; GRID], #[case] gained: Score) {
        assert_eq!(super::shift_row(row), (expected, gained));
    }

    #[test]
    fn rotate_clockwise() {
        let slots = [
            [1, 2, 3, 4],
            [5, 6, 7, 8],
            [9, 10, 11, 12],
            [13, 14, 15, 16],
        ];
        let expected = [
            [13, 9, 5, 1],
            [14, 10, 6, 2],
            [15, 11, 7, 3],
            [16, 12, 8, 4],
        ];
        assert_eq!(super::rotate(slots), expected);
    }

    #[test]
    fn four_rotations_are_identity() {
        let slots = [
            [2, 0, 4, 0],
            [0, 8, 0, 16],
            [32, 0, 64, 0],
            [0, 128, 0, 256],
        ];
        assert_eq!(super::rotate_n(slots, 4), slots);
    }

    #[rstest]
    #[case::left(Direction::Left,
        [[2, 2, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        [[4, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        4,
    )]
    #[case::right(Direction::Right,
        [[2, 2, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        [[0, 0, 0, 4], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        4,
    )]
    #[case::up(Direction::Up,
        [[2, 0, 0, 0], [2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        [[4, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        4,
    )]
    #[case::down(Direction::Down,
        [[2, 0, 0, 0], [2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        [[0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [4, 0, 0, 0]],
        4,
    )]
    #[case::up_merges_top_pair_first(Direction::Up,
        [[2, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0], [0, 0, 0, 0]],
        [[4, 0, 0, 0], [2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        4,
    )]
    #[case::down_merges_bottom_pair_first(Direction::Down,
        [[0, 2, 0, 0], [2, 2, 0, 0], [4, 2, 0, 0], [8, 0, 0, 0]],
        [[0, 0, 0, 0], [2, 0, 0, 0], [4, 2, 0, 0], [8, 4, 0, 0]],
        4,
    )]
    #[case::right_merge_priority(Direction::Right,
        [[4, 2, 0, 2], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        [[0, 0, 4, 4], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        4,
    )]
    #[case::mixed_rows(Direction::Left,
        [[0, 2, 4, 8], [0, 0, 0, 0], [4, 4, 0, 0], [2, 4, 8, 16]],
        [[2, 4, 8, 0], [0, 0, 0, 0], [8, 0, 0, 0], [2, 4, 8, 16]],
        8,
    )]
    fn shifted(
        #[case] direction: Direction,
        #[case] slots: Slots,
        #[case] expected: Slots,
        #[case] gained: Score,
    ) {
        assert_eq!(super::shifted(&slots, direction), (expected, gained));
    }

    #[rstest]
    #[case::left(Direction::Left)]
    #[case::right(Direction::Right)]
    #[case::up(Direction::Up)]
    #[case::down(Direction::Down)]
    fn noop_shift_leaves_round_untouched(#[case] direction: Direction) {
        // full grid with no adjacent equal pairs, nothing can move
        let initial = Round::from_parts(
            [
                [2, 4, 8, 16],
                [32, 64, 128, 256],
                [2, 4, 8, 16],
                [32, 64, 128, 256],
            ],
            12,
        );
        let mut shifted = initial.clone();
        let mut rng = rng();
        assert_eq!(shifted.shift(&mut rng, direction), None);
        assert_eq!(shifted, initial, "shifting {:?}", direction);
    }

    #[rstest]
    #[case::left(Direction::Left, [[2, 2, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]])]
    #[case::right(Direction::Right, [[2, 2, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]])]
    #[case::up(Direction::Up, [[2, 0, 0, 0], [2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]])]
    #[case::down(Direction::Down, [[2, 0, 0, 0], [2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]])]
    fn shift_spawns_exactly_one_card(#[case] direction: Direction, #[case] slots: Slots) {
        let initial = Round::from_parts(slots, 0);
        let mut shifted = initial.clone();
        let mut rng = rng();
        assert_eq!(shifted.shift(&mut rng, direction), Some(4));
        assert_eq!(shifted.score(), 4);
        // two 2s merged into one card, plus the spawned card
        assert_eq!(count_cards(&shifted), 2, "shifting {:?}", direction);
    }

    #[test]
    fn random_round_has_two_cards() {
        let mut rng = rng();
        for _ in 0..16 {
            let round = Round::random(&mut rng);
            assert_eq!(round.score(), 0);
            assert_eq!(count_cards(&round), 2);
            for y in 0..GRID {
                for x in 0..GRID {
                    let card = round.get(&Idx(x, y));
                    assert!(card == 0 || card == 2 || card == 4, "unexpected {}", card);
                }
            }
        }
    }

    #[test]
    fn spawn_on_full_grid_is_a_noop() {
        let initial = Round::from_parts([[2; GRID]; GRID], 0);
        let mut round = initial.clone();
        let mut rng = rng();
        assert_eq!(round.spawn(&mut rng), None);
        assert_eq!(round, initial);
    }

    #[test]
    fn spawned_cards_are_always_2_or_4() {
        let mut rng = rng();
        for _ in 0..64 {
            let mut round = Round::default();
            let idx = round.spawn(&mut rng).expect("empty grid must have room");
            let card = round.get(&idx);
            assert!(card == 2 || card == 4, "unexpected spawn {}", card);
        }
    }

    #[rstest]
    #[case::one_empty_cell(
        [[2, 4, 8, 16], [32, 64, 128, 256], [2, 4, 8, 16], [32, 64, 128, 0]],
        true,
    )]
    #[case::checkerboard_is_stuck(
        [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]],
        false,
    )]
    #[case::horizontal_pair(
        [[2, 2, 8, 16], [32, 64, 128, 256], [2, 4, 8, 16], [32, 64, 128, 256]],
        true,
    )]
    #[case::vertical_pair(
        [[2, 4, 8, 16], [2, 64, 128, 256], [4, 8, 16, 32], [32, 64, 128, 4]],
        true,
    )]
    fn has_moves(#[case] slots: Slots, #[case] expected: bool) {
        let round = Round::from_parts(slots, 0);
        assert_eq!(round.has_moves(), expected);
    }
}
