use crate::game::GameState;

/// Anything that can take a turn in a round.
pub trait Agent {
    /// Select a column for the current player, or `None` when no column has
    /// room.
    fn select_action(&mut self, state: &GameState) -> Option<usize>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}
