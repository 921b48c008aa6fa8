//! Row structs (`FromRow`) and the insert/update DTOs that go with them.

pub mod category;
pub mod contact;
pub mod session;
pub mod user;
