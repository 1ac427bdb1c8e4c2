//! Validated domain primitives shared by the fee engine and price sources.

mod amount;
mod coin;
mod direction;
mod timestamp;

pub use amount::Amount;
pub use coin::CoinSymbol;
pub use direction::Direction;
pub use timestamp::UtcDateTime;
