pub mod extract;
pub mod requests;
