pub mod domain;
pub mod feed;
pub mod ports;

pub use domain::{NewNote, Note, NoteId, Photo, UserId};
pub use feed::{day_label, group_by_date, month_label, DayGroup, GroupedFeed, MonthGroup};
pub use ports::{AuthService, BlobStore, NoteSnapshots, NoteStore, PortError, PortResult};
