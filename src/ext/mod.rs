mod path_ext;

pub use path_ext::{PathDisplayExt, resolve_best_effort};
