mod ffprobe_info;
mod path_validator;
mod process_runner;
mod video_scanner;

pub use ffprobe_info::{FfprobeOutput, FormatInfo, StreamInfo, StreamSelector};
pub use path_validator::{normalize_input_path, validate_directory_exists};
pub use process_runner::run_with_timeout;
pub use video_scanner::{VideoItem, scan_video_files};
