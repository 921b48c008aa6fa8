//! Response types for the page-style endpoints.
//!
//! A page is returned as a [`View`]: a JSON document naming the view and
//! carrying its context, field errors and flash messages. Successful form
//! submissions answer with [`SeeOther`], a `303` redirect whose body repeats
//! the target and carries the messages meant for the next page.

use agenda_core::validation::FieldErrors;
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A one-off message shown to the user on the next rendered page.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// A rendered view: `{ "view", "site_title", "data", "errors"?, "messages"? }`.
#[derive(Debug, Serialize)]
pub struct View<T> {
    #[serde(skip)]
    status: StatusCode,
    view: &'static str,
    site_title: String,
    data: T,
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    errors: FieldErrors,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    messages: Vec<Notice>,
}

impl<T> View<T> {
    /// A `200 OK` render of `view` with `data` as its context.
    pub fn new(view: &'static str, site_title: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            view,
            site_title: site_title.into(),
            data,
            errors: FieldErrors::new(),
            messages: Vec::new(),
        }
    }

    /// Re-render of a form that failed validation (`422`).
    pub fn invalid(mut self, errors: FieldErrors) -> Self {
        self.status = StatusCode::UNPROCESSABLE_ENTITY;
        self.errors = errors;
        self
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.messages.push(notice);
        self
    }
}

impl<T: Serialize> IntoResponse for View<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

/// `303 See Other` to `location`, with a JSON body
/// `{ "redirect", "messages", "data"? }`.
#[derive(Debug, Serialize)]
pub struct SeeOther<T = ()> {
    redirect: String,
    messages: Vec<Notice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl SeeOther {
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            redirect: location.into(),
            messages: Vec::new(),
            data: None,
        }
    }
}

impl<T> SeeOther<T> {
    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.messages.push(notice);
        self
    }

    /// Attach a payload for the client (used by login to hand over tokens).
    pub fn with_data<U>(self, data: U) -> SeeOther<U> {
        SeeOther {
            redirect: self.redirect,
            messages: self.messages,
            data: Some(data),
        }
    }

    pub fn location(&self) -> &str {
        &self.redirect
    }
}

impl<T: Serialize> IntoResponse for SeeOther<T> {
    fn into_response(self) -> Response {
        let location = self.redirect.clone();
        (StatusCode::SEE_OTHER, [(LOCATION, location)], Json(self)).into_response()
    }
}
