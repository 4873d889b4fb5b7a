pub mod display;
pub mod setup;

pub use display::{present_mode, sync_vsync_settings};
pub use setup::setup;
