pub use apr_file::{get_path, serialize, AprFile};

mod apr_file;
