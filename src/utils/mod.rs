pub mod error;
pub mod formats;
pub mod fs;
pub mod naming;

pub use error::{ConverterError, ConverterResult, ErrorKind};
pub use formats::{OutputFormat, is_image_path};
pub use fs::{collect_image_paths, format_file_size, read_input_image, write_output};
pub use naming::{dedupe_names, output_name};
