use super::{Board, BoardOracle, BoardShape, Player};
use crate::error::MoveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Player),
    /// Board full without a winning run.
    Draw,
}

/// Per-player win counters, kept across rounds until explicitly reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub red: u32,
    pub yellow: u32,
}

impl Scoreboard {
    pub fn score(&self, player: Player) -> u32 {
        match player {
            Player::Red => self.red,
            Player::Yellow => self.yellow,
        }
    }

    fn record_win(&mut self, player: Player) {
        match player {
            Player::Red => self.red += 1,
            Player::Yellow => self.yellow += 1,
        }
    }
}

/// The opening coin of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstMove {
    pub player: Player,
    pub column: usize,
}

/// What a single coin insertion did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    pub player: Player,
    pub column: usize,
    pub row: usize,
    pub outcome: Option<GameOutcome>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    outcome: Option<GameOutcome>,
    first_move: Option<FirstMove>,
    scores: Scoreboard,
}

impl GameState {
    /// Create initial game state
    pub fn initial() -> Self {
        Self::with_shape(BoardShape::default())
    }

    pub fn with_shape(shape: BoardShape) -> Self {
        GameState {
            board: Board::with_shape(shape),
            current_player: Player::Red, // Red starts
            outcome: None,
            first_move: None,
            scores: Scoreboard::default(),
        }
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Get game outcome if the round is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn winner(&self) -> Option<Player> {
        match self.outcome {
            Some(GameOutcome::Winner(player)) => Some(player),
            _ => None,
        }
    }

    /// True once the board filled up without a winner.
    pub fn is_stalemate(&self) -> bool {
        self.outcome == Some(GameOutcome::Draw)
    }

    /// Check if the round is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn first_move(&self) -> Option<FirstMove> {
        self.first_move
    }

    pub fn scores(&self) -> Scoreboard {
        self.scores
    }

    /// Get list of legal columns (not full)
    pub fn legal_actions(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.columns_with_room()
    }

    /// Apply a move and return new state (immutable)
    pub fn apply_move(&self, column: usize) -> Result<GameState, MoveError> {
        let mut next = self.clone();
        next.apply_move_mut(column)?;
        Ok(next)
    }

    /// Insert a coin for the current player. On error nothing changes.
    pub fn apply_move_mut(&mut self, column: usize) -> Result<MoveReport, MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let player = self.current_player;
        let row = self.board.drop_piece(column, player.to_cell())?;

        if self.first_move.is_none() {
            self.first_move = Some(FirstMove { player, column });
        }

        if self.board.check_win(row, column) {
            self.outcome = Some(GameOutcome::Winner(player));
            self.scores.record_win(player);
        } else if self.board.is_full() {
            self.outcome = Some(GameOutcome::Draw);
        }

        self.current_player = player.other();

        Ok(MoveReport {
            player,
            column,
            row,
            outcome: self.outcome,
        })
    }

    /// Empty the board for a new round. The player to move is kept, so the
    /// side that did not make the last move opens the next round.
    pub fn reset_board(&mut self) {
        self.board.clear();
        self.outcome = None;
        self.first_move = None;
    }

    /// Zero both win counters. The board and the round's outcome are kept.
    pub fn reset_scores(&mut self) {
        self.scores = Scoreboard::default();
    }
}
