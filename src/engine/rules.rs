use crate::board::Board;

/// Gameplay knobs that are not part of the board itself.
///
/// `move` and `selectAsset` always require the caller to hold the turn.
/// Whether drawing an event card or rolling also does is configurable.
#[derive(Debug, Clone, Default)]
pub struct Rules {
    board: Board,
    gate_draws: bool,
    gate_rolls: bool,
}

impl Rules {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            ..Self::default()
        }
    }
    pub fn gate_draws(mut self, gated: bool) -> Self {
        self.gate_draws = gated;
        self
    }
    pub fn gate_rolls(mut self, gated: bool) -> Self {
        self.gate_rolls = gated;
        self
    }
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn draws_gated(&self) -> bool {
        self.gate_draws
    }
    pub fn rolls_gated(&self) -> bool {
        self.gate_rolls
    }
}
