// Registration and login. Sessions are not issued; callers pass user ids explicitly.

pub mod handlers;
pub mod password;
