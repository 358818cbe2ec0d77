pub mod chart;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod page;
pub mod query;
pub mod server;
pub mod sidebar;
