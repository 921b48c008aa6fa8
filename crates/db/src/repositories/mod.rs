//! Query layer. Each repository is a unit struct whose async methods take
//! `&PgPool` first and return plain `sqlx::Error`s.

pub mod category_repo;
pub mod contact_repo;
pub mod session_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use contact_repo::ContactRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
