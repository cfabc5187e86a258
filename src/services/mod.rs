pub mod assignments;
pub mod auth;
pub mod files;
pub mod users;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use files::FileService;
pub use users::UserService;
