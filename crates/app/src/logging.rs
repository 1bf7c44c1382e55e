use std::fs::File;
use std::path::Path;

use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

/// Send log output to `path` so it does not interleave with the quiz prompt.
///
/// Logging is optional: if the file cannot be created the app runs without it.
pub fn init_file_logger(path: &Path, level: LevelFilter) {
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();

    match File::create(path) {
        Ok(file) => {
            let _ = WriteLogger::init(level, config, file);
        }
        Err(err) => eprintln!("logging disabled ({}): {err}", path.display()),
    }
}
