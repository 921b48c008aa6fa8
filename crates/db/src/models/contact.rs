//! Contact entity model and DTOs.

use agenda_core::contact::ContactInput;
use agenda_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `contacts` table joined with its category name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contact {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub created_date: Timestamp,
    pub description: String,
    pub show: bool,
    /// Path relative to the media root, e.g. `pictures/2024/03/<uuid>.png`.
    pub picture: Option<String>,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub owner_id: Option<DbId>,
}

impl Contact {
    /// `"First Last"`, matching how contacts are titled in views.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The editable fields, for pre-filling the update form.
    pub fn as_input(&self) -> ContactInput {
        ContactInput {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            description: self.description.clone(),
            category_id: self.category_id,
        }
    }
}

/// DTO for inserting a contact. The owner is passed separately to
/// [`ContactRepo::create`](crate::repositories::ContactRepo::create).
#[derive(Debug, Clone)]
pub struct CreateContact {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub description: String,
    pub category_id: Option<DbId>,
    pub picture: Option<String>,
}

/// DTO for updating a contact's editable fields.
///
/// `picture: None` keeps the stored picture; owner and visibility are not
/// editable.
#[derive(Debug, Clone)]
pub struct UpdateContact {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub description: String,
    pub category_id: Option<DbId>,
    pub picture: Option<String>,
}

impl CreateContact {
    pub fn from_input(input: ContactInput, picture: Option<String>) -> Self {
        Self {
            first_name: input.first_name,
            last_name: input.last_name,
            phone: input.phone,
            email: input.email,
            description: input.description,
            category_id: input.category_id,
            picture,
        }
    }
}

impl UpdateContact {
    pub fn from_input(input: ContactInput, picture: Option<String>) -> Self {
        Self {
            first_name: input.first_name,
            last_name: input.last_name,
            phone: input.phone,
            email: input.email,
            description: input.description,
            category_id: input.category_id,
            picture,
        }
    }
}
