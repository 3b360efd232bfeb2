pub mod filesystem;
pub mod value;

pub use filesystem::write_error_to_log;
pub use value::{append_message, is_empty, parse_total, to_float, to_int};
