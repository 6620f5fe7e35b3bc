pub mod review;
pub mod search;
pub mod wizard;
