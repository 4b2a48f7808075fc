mod note;

pub use note::{Note, Upload, MEDIA_URL};
