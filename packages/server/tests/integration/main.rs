mod media;
mod photos;
