pub mod admin;
pub mod user;

pub use user::UserService;
