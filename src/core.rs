pub mod cache;
pub mod conflict_finder;
pub mod conflict_scan;
pub mod decompression;
pub mod descriptor;
pub mod library;
pub mod locale_audit;
pub mod mod_manager;
pub mod profile;
pub mod session;
