pub mod block;
pub mod mode;
pub mod trade;

pub use block::RawBlock;
pub use mode::AcquisitionMode;
pub use trade::{Trade, TradeSet, WIN_MULTIPLIER};
