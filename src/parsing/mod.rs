pub mod html;
pub mod magnitude;
pub mod record;
pub mod timestamp;

pub use html::call_blocks;
pub use magnitude::{decode_magnitude, try_decode_magnitude};
pub use record::{RecordParser, CALLED_MARKER, REACHED_MARKER};
pub use timestamp::parse_timestamp;
