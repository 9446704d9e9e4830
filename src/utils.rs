pub mod context;
pub mod file;
pub mod json;
pub mod logging;
pub mod ordered_map;
