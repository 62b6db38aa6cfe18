mod mirror_file;

pub use mirror_file::{MIRROR_FILE_NAME, MirrorFile, MirrorFileError, default_mirror_file_path};
