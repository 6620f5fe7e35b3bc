pub mod api;
pub mod campaign;
pub mod logging;
pub mod review;
pub mod search;
pub mod submission;
