//! Domain logic for the contact directory: shared types, errors, form
//! cleaning, pagination and search helpers. No database or HTTP code lives
//! here.

pub mod account;
pub mod contact;
pub mod error;
pub mod pagination;
pub mod picture;
pub mod search;
pub mod types;
pub mod validation;
