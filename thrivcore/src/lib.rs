mod macros;

pub mod ac;
pub mod availability;
pub mod category;
pub mod error;
pub mod favorite;
pub mod institution;
pub mod notify;
pub mod platform;
pub mod resource;
pub mod resource_type;
pub mod search;
pub mod segment;
