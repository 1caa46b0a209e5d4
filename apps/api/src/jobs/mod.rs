pub mod handlers;
pub mod requirements;
