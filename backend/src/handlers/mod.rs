pub mod auth;
pub mod requests;
pub mod reviews;
pub mod skills;
pub mod users;
