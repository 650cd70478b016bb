pub mod error_handler;

pub use error_handler::{handle_refresh_error, json_error_handler};
