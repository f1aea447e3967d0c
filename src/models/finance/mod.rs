pub mod analytics;
pub mod entities;
pub mod requests;
pub mod responses;
