pub mod interaction;
pub mod locomotion;
pub mod player;
pub mod settings;
pub mod ui;
pub mod watch;
