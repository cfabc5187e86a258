pub mod requests;
pub mod responses;

pub use requests::{ExternalLoginRequest, LoginRequest};
pub use responses::LoginResponse;
