/// What the player can ask the terminal front-end to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    Start,
    Answer { choice: usize },
    Continue,
    ResetRun,
    ClearProgress,
    ClaimAll,
    Shop,
    Buy { item_id: String },
    Equip { item_id: String },
    Sell { item_id: String },
    Status,
    Quit,
}
