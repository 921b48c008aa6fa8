//! Handlers for `/user`: register, login, logout, token refresh and the
//! profile self-update.

use agenda_core::account::{
    ProfileForm, RegisterForm, EMAIL_TAKEN_MESSAGE, USERNAME_TAKEN_MESSAGE,
};
use agenda_core::error::CoreError;
use agenda_core::types::DbId;
use agenda_core::validation::{FieldErrors, REQUIRED_MESSAGE};
use agenda_db::models::session::CreateSession;
use agenda_db::models::user::{CreateUser, UpdateProfile, User, UserResponse};
use agenda_db::repositories::{SessionRepo, UserRepo};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult, LOGIN_PATH};
use crate::middleware::auth::AuthUser;
use crate::query::NextParams;
use crate::response::{Notice, SeeOther, View};
use crate::state::AppState;

pub const INVALID_LOGIN_MESSAGE: &str = "Invalid username or password";

const PROFILE_PATH: &str = "/user/update";
const HOME_PATH: &str = "/contacts";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Login form. `next` is where to go after a successful login.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Request body for `POST /user/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Tokens handed to the client by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct FormContext<F> {
    pub form: F,
}

// ---------------------------------------------------------------------------
// Register
// ---------------------------------------------------------------------------

/// GET /user/register
pub async fn register_form() -> View<FormContext<RegisterForm>> {
    register_view(RegisterForm::default())
}

/// POST /user/register
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let mut errors = FieldErrors::new();
    let cleaned = match form.clean() {
        Ok(input) => Some(input),
        Err(form_errors) => {
            errors.merge(form_errors);
            None
        }
    };
    check_unique(&state.pool, &form.username, &form.email, None, &mut errors).await?;

    let input = match cleaned {
        Some(input) if errors.is_empty() => input,
        _ => return Ok(register_view(form).invalid(errors).into_response()),
    };

    let password = input
        .password
        .as_deref()
        .ok_or_else(|| AppError::InternalError("Registration cleaned without a password".into()))?;
    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            password_hash,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok(SeeOther::to(HOME_PATH)
        .with_notice(Notice::success("User registered"))
        .into_response())
}

// ---------------------------------------------------------------------------
// Login / logout / refresh
// ---------------------------------------------------------------------------

/// GET /user/login
pub async fn login_form(Query(params): Query<NextParams>) -> View<FormContext<LoginForm>> {
    login_view(LoginForm {
        next: params.next,
        ..Default::default()
    })
}

/// POST /user/login
///
/// Unknown usernames and wrong passwords fail identically. On success a new
/// session is created and its tokens travel in the redirect body.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    // Text columns cannot be compared against NUL; such a name matches nobody.
    let user = if form.username.is_empty()
        || form.password.is_empty()
        || form.username.contains('\0')
    {
        None
    } else {
        UserRepo::find_by_username(&state.pool, &form.username).await?
    };

    let verified = match &user {
        Some(user) => verify_password(&form.password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?,
        None => false,
    };

    let user = match user {
        Some(user) if verified => user,
        _ => {
            tracing::info!(username = %form.username, "Failed login attempt");
            let mut errors = FieldErrors::new();
            if form.username.is_empty() {
                errors.add("username", REQUIRED_MESSAGE);
            }
            if form.password.is_empty() {
                errors.add("password", REQUIRED_MESSAGE);
            }
            return Ok(login_view(form)
                .invalid(errors)
                .with_status(StatusCode::UNAUTHORIZED)
                .with_notice(Notice::error(INVALID_LOGIN_MESSAGE))
                .into_response());
        }
    };

    UserRepo::record_login(&state.pool, user.id).await?;
    let tokens = issue_tokens(&state, &user).await?;
    tracing::info!(user_id = user.id, "User logged in");

    let target = form
        .next
        .as_deref()
        .filter(|next| is_local_path(next))
        .unwrap_or(HOME_PATH);

    Ok(SeeOther::to(target)
        .with_notice(Notice::success("Logged in successfully"))
        .with_data(tokens)
        .into_response())
}

/// GET|POST /user/logout
///
/// Revokes the session behind the presented token.
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> AppResult<SeeOther> {
    SessionRepo::revoke(&state.pool, user.session_id).await?;
    tracing::info!(user_id = user.user_id, session_id = user.session_id, "User logged out");
    Ok(SeeOther::to(LOGIN_PATH))
}

/// POST /user/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens. The old
/// session is revoked.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthTokens>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    if !SessionRepo::revoke(&state.pool, session.id).await? {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Refresh token already used".into(),
        )));
    }

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let tokens = issue_tokens(&state, &user).await?;
    tracing::debug!(user_id = user.id, "Session refreshed");
    Ok(Json(tokens))
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// GET /user/update
pub async fn profile_form(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<View<FormContext<ProfileForm>>> {
    let account = load_account(&state.pool, &user).await?;
    Ok(profile_view(ProfileForm::new(
        &account.username,
        &account.first_name,
        &account.last_name,
        &account.email,
    )))
}

/// POST /user/update
///
/// The password changes only when either password field is filled in.
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Form(form): Form<ProfileForm>,
) -> AppResult<Response> {
    let mut errors = FieldErrors::new();
    let cleaned = match form.clean() {
        Ok(input) => Some(input),
        Err(form_errors) => {
            errors.merge(form_errors);
            None
        }
    };
    check_unique(
        &state.pool,
        &form.username,
        &form.email,
        Some(user.user_id),
        &mut errors,
    )
    .await?;

    let input = match cleaned {
        Some(input) if errors.is_empty() => input,
        _ => {
            return Ok(profile_view(form)
                .invalid(errors)
                .with_notice(Notice::error("Error updating profile"))
                .into_response())
        }
    };

    UserRepo::update_profile(
        &state.pool,
        user.user_id,
        &UpdateProfile {
            username: input.username,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "User",
        id: user.user_id,
    }))?;

    if let Some(password) = input.password.as_deref() {
        let password_hash = hash_password(password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
        UserRepo::update_password(&state.pool, user.user_id, &password_hash).await?;
        tracing::info!(user_id = user.user_id, "Password changed");
    }
    tracing::info!(user_id = user.user_id, "Profile updated");

    Ok(SeeOther::to(PROFILE_PATH)
        .with_notice(Notice::success("Profile updated"))
        .into_response())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn register_view(form: RegisterForm) -> View<FormContext<RegisterForm>> {
    View::new("contact/register", "Register -", FormContext { form })
}

fn login_view(form: LoginForm) -> View<FormContext<LoginForm>> {
    View::new("contact/login", "Login -", FormContext { form })
}

fn profile_view(form: ProfileForm) -> View<FormContext<ProfileForm>> {
    View::new("contact/user-update", "Update profile -", FormContext { form })
}

async fn load_account(pool: &PgPool, user: &AuthUser) -> AppResult<User> {
    UserRepo::find_by_id(pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))
}

/// Add "already taken" errors for username and email, skipping fields that
/// already failed validation and the account being edited.
async fn check_unique(
    pool: &PgPool,
    username: &str,
    email: &str,
    exclude_id: Option<DbId>,
    errors: &mut FieldErrors,
) -> AppResult<()> {
    let username = username.trim();
    if !errors.contains("username") && UserRepo::username_taken(pool, username, exclude_id).await?
    {
        errors.add("username", USERNAME_TAKEN_MESSAGE);
    }
    let email = email.trim();
    if !errors.contains("email") && UserRepo::email_taken(pool, email, exclude_id).await? {
        errors.add("email", EMAIL_TAKEN_MESSAGE);
    }
    Ok(())
}

/// Create a session row and the token pair that refers to it.
async fn issue_tokens(state: &AppState, user: &User) -> AppResult<AuthTokens> {
    let jwt = &state.config.jwt;
    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let session = SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh_hash,
            expires_at: jwt.refresh_expires_at(),
        },
    )
    .await?;

    let access_token = generate_access_token(user.id, session.id, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthTokens {
        access_token,
        refresh_token: refresh_plaintext,
        token_type: "Bearer",
        expires_in: jwt.access_token_ttl_secs(),
        user: UserResponse::from(user),
    })
}

/// Only same-site absolute paths are followed after login.
fn is_local_path(next: &str) -> bool {
    next.starts_with('/')
        && !next.starts_with("//")
        && !next.contains('\\')
        && !next.chars().any(char::is_control)
}
