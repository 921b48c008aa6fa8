//! Contact form cleaning and validation (pure logic, no database access).
//!
//! The HTTP layer collects submitted fields into a [`ContactForm`] of raw
//! strings. [`ContactForm::clean`] trims the text, checks lengths and the
//! email format, parses the category choice and returns a [`ContactInput`]
//! ready to persist, or the field errors to show next to the form.
//!
//! Whether the chosen category exists is checked by the caller, which has
//! the database handle; see [`INVALID_CHOICE_MESSAGE`].

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::DbId;
use crate::validation::{
    clean_optional, clean_text, reject_null_characters, FieldErrors, REQUIRED_MESSAGE,
};

pub const INVALID_CHOICE_MESSAGE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

const SAME_NAMES_MESSAGE: &str = "First name and last name must be different.";

/// Raw contact fields as submitted. Every field defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub description: String,
    pub category: String,
}

/// Cleaned contact fields. Owner and visibility are never part of the form.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ContactInput {
    #[validate(length(
        min = 1,
        max = 20,
        message = "Ensure this value has at most 20 characters."
    ))]
    pub first_name: String,
    #[validate(length(
        max = 30,
        message = "Ensure this value has at most 30 characters."
    ))]
    pub last_name: String,
    #[validate(length(
        min = 1,
        max = 20,
        message = "Ensure this value has at most 20 characters."
    ))]
    pub phone: String,
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 200, message = "Ensure this value has at most 200 characters.")
    )]
    pub email: Option<String>,
    pub description: String,
    pub category_id: Option<DbId>,
}

impl ContactForm {
    /// Pre-fill the form from stored values (used by the update view).
    pub fn from_input(input: &ContactInput) -> Self {
        Self {
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            phone: input.phone.clone(),
            email: input.email.clone().unwrap_or_default(),
            description: input.description.clone(),
            category: input.category_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }

    pub fn clean(&self) -> Result<ContactInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        reject_null_characters(
            &[
                ("first_name", &self.first_name),
                ("last_name", &self.last_name),
                ("phone", &self.phone),
                ("email", &self.email),
                ("description", &self.description),
                ("category", &self.category),
            ],
            &mut errors,
        );

        let category_id = match clean_optional(&self.category) {
            None => None,
            Some(raw) => match raw.parse::<DbId>() {
                Ok(id) if id > 0 => Some(id),
                _ => {
                    errors.add("category", INVALID_CHOICE_MESSAGE);
                    None
                }
            },
        };

        let input = ContactInput {
            first_name: clean_text(&self.first_name),
            last_name: clean_text(&self.last_name),
            phone: clean_text(&self.phone),
            email: clean_optional(&self.email),
            description: clean_text(&self.description),
            category_id,
        };

        if input.first_name.is_empty() {
            errors.add("first_name", REQUIRED_MESSAGE);
        }
        if input.phone.is_empty() {
            errors.add("phone", REQUIRED_MESSAGE);
        }

        if let Err(validation) = input.validate() {
            let mut converted = FieldErrors::from(validation);
            // Blank required fields already carry the clearer message.
            for field in ["first_name", "phone"] {
                if errors.contains(field) {
                    converted.remove(field);
                }
            }
            errors.merge(converted);
        }

        if !input.first_name.is_empty() && input.first_name == input.last_name {
            errors.add("first_name", SAME_NAMES_MESSAGE);
            errors.add("last_name", SAME_NAMES_MESSAGE);
        }

        errors.into_result(input)
    }
}
