pub mod author;
pub mod stamp;
