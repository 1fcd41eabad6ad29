pub mod fields;
pub mod layout;
pub mod words;

pub use fields::to_numbered_fields;
pub use layout::{decode_frame, select_layout, FrameError, Layout};
