
pub mod books;
pub mod films;
pub mod list_entries;
pub mod media;
pub mod related_media;
pub mod series;
pub mod users;
