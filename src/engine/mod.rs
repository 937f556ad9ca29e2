pub mod difficulty;
pub mod mastery;
pub mod picker;
pub mod pool;

pub use difficulty::Difficulty;
pub use mastery::{CardDeck, CardState, REQUIRED_STREAK};
pub use pool::{ChunkInfo, active_pool, current_chunk};
