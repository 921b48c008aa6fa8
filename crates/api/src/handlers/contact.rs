//! Handlers for the contact directory pages.
//!
//! Read paths (`index`, `search`, `detail`) are public and only ever see
//! visible contacts. Write paths require an [`AuthUser`] and act only on
//! visible contacts that user owns; anything else is a plain 404.

use agenda_core::contact::{ContactForm, ContactInput, INVALID_CHOICE_MESSAGE};
use agenda_core::error::CoreError;
use agenda_core::pagination::{PageWindow, Paginator, CONTACTS_PER_PAGE};
use agenda_core::picture::{picture_url, verify_picture};
use agenda_core::search::normalize_query;
use agenda_core::types::DbId;
use agenda_core::validation::FieldErrors;
use agenda_db::models::category::Category;
use agenda_db::models::contact::{Contact, CreateContact, UpdateContact};
use agenda_db::repositories::{CategoryRepo, ContactRepo};
use axum::extract::rejection::FormRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Form;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::media::{discard_picture, store_picture};
use crate::middleware::auth::AuthUser;
use crate::query::{PageParams, SearchParams};
use crate::response::{Notice, SeeOther, View};
use crate::state::AppState;

const LIST_TITLE: &str = "Contacts -";

// ---------------------------------------------------------------------------
// View context types
// ---------------------------------------------------------------------------

/// A contact as shown to clients: the stored row plus its picture URL.
#[derive(Debug, Serialize)]
pub struct ContactView {
    #[serde(flatten)]
    pub contact: Contact,
    pub picture_url: Option<String>,
}

impl ContactView {
    fn new(contact: Contact, media_url: &str) -> Self {
        let url = contact
            .picture
            .as_deref()
            .map(|path| picture_url(media_url, path));
        Self {
            contact,
            picture_url: url,
        }
    }
}

/// One page of a listing with its navigation data.
#[derive(Debug, Serialize)]
pub struct PageObj<T> {
    pub object_list: Vec<T>,
    #[serde(flatten)]
    pub window: PageWindow,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous_page_number: Option<i64>,
    pub next_page_number: Option<i64>,
}

impl<T> PageObj<T> {
    fn new(window: PageWindow, object_list: Vec<T>) -> Self {
        Self {
            object_list,
            has_previous: window.has_previous(),
            has_next: window.has_next(),
            previous_page_number: window.previous_page_number(),
            next_page_number: window.next_page_number(),
            window,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListContext {
    pub page_obj: PageObj<ContactView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_value: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DetailContext {
    pub contact: ContactView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FormContext {
    pub form: ContactForm,
    pub from_action: String,
    pub categories: Vec<Category>,
    /// The contact being edited; absent on create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactView>,
}

/// Form body for `POST /contacts/{id}/delete`.
#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub confirmation: Option<String>,
}

// ---------------------------------------------------------------------------
// Read paths
// ---------------------------------------------------------------------------

/// GET / and GET /contacts
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<View<ListContext>> {
    let count = ContactRepo::count_visible(&state.pool).await?;
    let window = Paginator::new(count, CONTACTS_PER_PAGE).page(params.page.as_deref());
    let contacts = ContactRepo::list_visible(&state.pool, window.limit, window.offset).await?;

    Ok(View::new(
        "contact/index",
        LIST_TITLE,
        ListContext {
            page_obj: page_of(window, contacts, &state.config.media_url),
            search_value: None,
        },
    ))
}

/// GET /contacts/search?q=
///
/// A blank query redirects to the full listing.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Response> {
    let Some(term) = normalize_query(params.q.as_deref()) else {
        return Ok(SeeOther::to("/contacts").into_response());
    };

    let count = ContactRepo::count_search(&state.pool, &term).await?;
    let window = Paginator::new(count, CONTACTS_PER_PAGE).page(params.page.as_deref());
    let contacts = ContactRepo::search(&state.pool, &term, window.limit, window.offset).await?;
    tracing::debug!(term = %term, count, "Contact search");

    Ok(View::new(
        "contact/index",
        LIST_TITLE,
        ListContext {
            page_obj: page_of(window, contacts, &state.config.media_url),
            search_value: Some(term),
        },
    )
    .into_response())
}

/// GET /contacts/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<View<DetailContext>> {
    let contact = ContactRepo::find_visible(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }))?;

    Ok(detail_view(contact, None, &state.config.media_url))
}

// ---------------------------------------------------------------------------
// Create / update
// ---------------------------------------------------------------------------

/// GET /contacts/create
pub async fn create_form(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<View<FormContext>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(form_view(
        "Create contact -",
        FormContext {
            form: ContactForm::default(),
            from_action: "/contacts/create".to_string(),
            categories,
            contact: None,
        },
    ))
}

/// POST /contacts/create (multipart)
///
/// The new contact is always owned by the authenticated user; owner and
/// visibility fields in the submission are ignored.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<Response> {
    let submission = read_submission(multipart).await?;

    let (input, picture_ext) = match clean_submission(&state, &submission).await? {
        Ok(cleaned) => cleaned,
        Err(errors) => {
            let categories = CategoryRepo::list(&state.pool).await?;
            let context = FormContext {
                form: submission.form,
                from_action: "/contacts/create".to_string(),
                categories,
                contact: None,
            };
            return Ok(form_view("Create contact -", context)
                .invalid(errors)
                .into_response());
        }
    };

    let picture_path = match (submission.picture.as_deref(), picture_ext) {
        (Some(bytes), Some(ext)) => Some(store_picture(&state.config.media_root, bytes, ext).await?),
        _ => None,
    };

    let stored = picture_path.clone();
    let created = ContactRepo::create(
        &state.pool,
        user.user_id,
        &CreateContact::from_input(input, picture_path),
    )
    .await;
    if created.is_err() {
        discard_picture(&state.config.media_root, stored.as_deref()).await;
    }
    let contact = created?;
    tracing::info!(user_id = user.user_id, contact_id = contact.id, "Contact created");

    Ok(SeeOther::to(update_path(contact.id))
        .with_notice(Notice::success("Contact created"))
        .into_response())
}

/// GET /contacts/{id}/update
pub async fn update_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<View<FormContext>> {
    let contact = find_owned(&state, id, &user).await?;
    let categories = CategoryRepo::list(&state.pool).await?;

    Ok(form_view(
        "Update contact -",
        FormContext {
            form: ContactForm::from_input(&contact.as_input()),
            from_action: update_path(id),
            categories,
            contact: Some(ContactView::new(contact, &state.config.media_url)),
        },
    ))
}

/// POST /contacts/{id}/update (multipart)
///
/// The stored picture is kept unless a new one is uploaded.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Response> {
    let contact = find_owned(&state, id, &user).await?;
    let submission = read_submission(multipart).await?;

    let (input, picture_ext) = match clean_submission(&state, &submission).await? {
        Ok(cleaned) => cleaned,
        Err(errors) => {
            let categories = CategoryRepo::list(&state.pool).await?;
            let context = FormContext {
                form: submission.form,
                from_action: update_path(id),
                categories,
                contact: Some(ContactView::new(contact, &state.config.media_url)),
            };
            return Ok(form_view("Update contact -", context)
                .invalid(errors)
                .into_response());
        }
    };

    let picture_path = match (submission.picture.as_deref(), picture_ext) {
        (Some(bytes), Some(ext)) => Some(store_picture(&state.config.media_root, bytes, ext).await?),
        _ => None,
    };

    let stored = picture_path.clone();
    let updated = ContactRepo::update_owned(
        &state.pool,
        id,
        user.user_id,
        &UpdateContact::from_input(input, picture_path),
    )
    .await;
    if !matches!(updated, Ok(Some(_))) {
        discard_picture(&state.config.media_root, stored.as_deref()).await;
    }
    updated?.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Contact",
        id,
    }))?;
    tracing::info!(user_id = user.user_id, contact_id = id, "Contact updated");

    Ok(SeeOther::to(update_path(id)).into_response())
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// GET /contacts/{id}/delete
///
/// Shows the contact with `confirmation = "no"`, i.e. the confirmation prompt.
pub async fn delete_prompt(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<View<DetailContext>> {
    let contact = find_owned(&state, id, &user).await?;
    Ok(detail_view(
        contact,
        Some("no".to_string()),
        &state.config.media_url,
    ))
}

/// POST /contacts/{id}/delete
///
/// Deletes only when `confirmation=yes`; any other value, or no form at all,
/// re-renders the contact with that value and leaves it in place.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    form: Result<Form<DeleteForm>, FormRejection>,
) -> AppResult<Response> {
    let contact = find_owned(&state, id, &user).await?;
    let confirmation = form
        .ok()
        .and_then(|Form(f)| f.confirmation)
        .unwrap_or_else(|| "no".to_string());

    if confirmation != "yes" {
        return Ok(detail_view(contact, Some(confirmation), &state.config.media_url).into_response());
    }

    if !ContactRepo::delete_owned(&state.pool, id, user.user_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }));
    }
    tracing::info!(user_id = user.user_id, contact_id = id, "Contact deleted");

    Ok(SeeOther::to("/contacts").into_response())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Raw multipart submission: text fields plus the optional picture bytes.
#[derive(Debug, Default)]
struct Submission {
    form: ContactForm,
    picture: Option<Vec<u8>>,
}

async fn read_submission(mut multipart: Multipart) -> AppResult<Submission> {
    let mut submission = Submission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "picture" {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            // An empty file part means no upload.
            if !data.is_empty() {
                submission.picture = Some(data.to_vec());
            }
            continue;
        }

        let slot = match name.as_str() {
            "first_name" => &mut submission.form.first_name,
            "last_name" => &mut submission.form.last_name,
            "phone" => &mut submission.form.phone,
            "email" => &mut submission.form.email,
            "description" => &mut submission.form.description,
            "category" => &mut submission.form.category,
            _ => continue, // owner, show and unknown fields are ignored
        };
        *slot = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
    }

    Ok(submission)
}

/// Cleaned fields plus the extension the uploaded picture decoded as.
type Cleaned = (ContactInput, Option<&'static str>);

/// Validate a submission. The outer `Result` carries infrastructure errors,
/// the inner one the field errors to re-render with.
async fn clean_submission(
    state: &AppState,
    submission: &Submission,
) -> AppResult<Result<Cleaned, FieldErrors>> {
    let mut errors = FieldErrors::new();

    let input = match submission.form.clean() {
        Ok(input) => Some(input),
        Err(form_errors) => {
            errors.merge(form_errors);
            None
        }
    };

    if !errors.contains("category") {
        if let Ok(category_id) = submission.form.category.trim().parse::<DbId>() {
            if CategoryRepo::find_by_id(&state.pool, category_id)
                .await?
                .is_none()
            {
                errors.add("category", INVALID_CHOICE_MESSAGE);
            }
        }
    }

    let picture_ext = match submission.picture.as_deref() {
        Some(bytes) => match verify_picture(bytes) {
            Ok(ext) => Some(ext),
            Err(msg) => {
                errors.add("picture", msg);
                None
            }
        },
        None => None,
    };

    Ok(match input {
        Some(input) if errors.is_empty() => Ok((input, picture_ext)),
        _ => Err(errors),
    })
}

async fn find_owned(state: &AppState, id: DbId, user: &AuthUser) -> AppResult<Contact> {
    ContactRepo::find_owned(&state.pool, id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }))
}

fn page_of(window: PageWindow, contacts: Vec<Contact>, media_url: &str) -> PageObj<ContactView> {
    let views = contacts
        .into_iter()
        .map(|c| ContactView::new(c, media_url))
        .collect();
    PageObj::new(window, views)
}

fn detail_view(
    contact: Contact,
    confirmation: Option<String>,
    media_url: &str,
) -> View<DetailContext> {
    let title = format!("{} -", contact.full_name());
    View::new(
        "contact/contact",
        title,
        DetailContext {
            contact: ContactView::new(contact, media_url),
            confirmation,
        },
    )
}

fn form_view(title: &str, context: FormContext) -> View<FormContext> {
    View::new("contact/create", title, context)
}

fn update_path(id: DbId) -> String {
    format!("/contacts/{id}/update")
}
