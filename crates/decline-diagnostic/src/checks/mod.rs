//! Independent rule checks. Each returns zero or more flags and none
//! depends on another's result.

mod sector;
mod smart_money;
mod technical;
mod valuation;
mod volume;

pub use sector::check_sector;
pub use smart_money::check_smart_money;
pub use technical::{check_technical, week52_position};
pub use valuation::check_valuation;
pub use volume::check_volume;
