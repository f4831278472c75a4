pub mod bone;
pub mod skeleton;
pub mod state;
pub mod timeline;
