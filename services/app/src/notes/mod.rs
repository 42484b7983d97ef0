pub mod detail;
pub mod feed_task;
pub mod save_task;

// Re-export the pipeline entry points to keep call sites short.
pub use detail::{date_line, delete_note, get_note, DeleteError, DetailError};
pub use feed_task::{subscribe, FeedStream, FeedUpdate};
pub use save_task::{photo_path, save_note, SaveError};
