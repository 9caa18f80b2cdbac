pub mod media;
pub mod photo;
