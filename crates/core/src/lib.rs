mod assets;
mod format;

pub mod config;
pub mod lang;
pub mod offline;
pub mod scrollback;
pub mod session;

pub use crate::assets::{get_config_dir, get_data_dir, get_default_config};
pub use crate::format::format_values;
