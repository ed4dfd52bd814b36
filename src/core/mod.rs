pub mod error;
pub mod key;
pub mod record;

pub use error::{DashError, Result};
pub use key::Key;
pub use record::{GameRecord, GameStats, RankInfo, BGG_GAME_URL};
