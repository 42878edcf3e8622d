pub mod images;
pub mod requests;
pub mod responses;
