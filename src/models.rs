pub mod annotation;
pub mod conflict;
pub mod error;
pub mod load_order;
pub mod mod_dto;
pub mod paths;
pub mod task_status;
