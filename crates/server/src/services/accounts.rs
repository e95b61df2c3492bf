//! Registration, login, session resolution and user search.

use argon2::{PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Duration;

use pigeon_shared::validation::{validate_email, validate_username};

use crate::error::{AppError, AppResult};
use crate::models::{
    new_id, non_blank, now, AuthUser, NewSession, NewUser, RegisterRequest, LoginRequest, User,
    UserSummary,
};
use crate::store::UserStore;

/// A freshly issued session credential.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = argon2::password_hash::SaltString::generate(&mut rand::rngs::OsRng);
    argon2::Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::internal("Failed to hash password", e))
}

fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::internal("Stored credential is unreadable", e))?;
    Ok(argon2::Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub async fn register(users: &dyn UserStore, req: RegisterRequest) -> AppResult<User> {
    let (username, email, password) = match (
        non_blank(req.username.as_deref()),
        non_blank(req.email.as_deref()),
        req.password.as_deref().filter(|p| !p.is_empty()),
    ) {
        (Some(u), Some(e), Some(p)) => (u.to_string(), e.to_lowercase(), p.to_string()),
        _ => return Err(AppError::invalid("Missing fields")),
    };

    validate_username(&username).map_err(AppError::invalid)?;
    validate_email(&email).map_err(AppError::invalid)?;

    if users.username_or_email_taken(&username, &email).await? {
        return Err(AppError::conflict("Username or Email already exists"));
    }

    let user = NewUser {
        id: new_id(),
        username,
        email,
        password_hash: hash_password(&password)?,
        first_name: non_blank(req.first_name.as_deref()).map(str::to_string),
        last_name: non_blank(req.last_name.as_deref()).map(str::to_string),
        created_at: now(),
    };

    // A concurrent registration can still win the race; the store reports it as a duplicate
    let user = users.insert_user(&user).await?;
    tracing::info!("registered user {} ({})", user.username, user.id);
    Ok(user)
}

pub async fn login(
    users: &dyn UserStore,
    req: LoginRequest,
    session_ttl: Duration,
) -> AppResult<LoginOutcome> {
    let (identifier, password) = match (
        non_blank(req.identifier.as_deref()),
        req.password.as_deref().filter(|p| !p.is_empty()),
    ) {
        (Some(i), Some(p)) => (i, p),
        _ => return Err(AppError::unauthorized("Invalid credentials")),
    };

    let credential = users
        .find_credential(identifier)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    if !verify_password(password, &credential.password_hash)? {
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let created_at = now();
    let session = NewSession {
        id: new_id(),
        user_id: credential.user.id.clone(),
        token: uuid::Uuid::new_v4().simple().to_string(),
        expires_at: created_at + session_ttl,
        created_at,
    };
    users.insert_session(&session).await?;

    tracing::debug!("issued session for {}", credential.user.id);
    Ok(LoginOutcome {
        user: credential.user,
        token: session.token,
    })
}

/// Resolve a session credential to the calling user.
pub async fn authenticate(users: &dyn UserStore, token: &str) -> AppResult<AuthUser> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::unauthorized("Not authenticated"));
    }
    users
        .resolve_session(token, now())
        .await?
        .ok_or_else(|| AppError::unauthorized("Unauthorized"))
}

pub async fn search_users(
    users: &dyn UserStore,
    caller: &AuthUser,
    query: Option<&str>,
) -> AppResult<Vec<UserSummary>> {
    let fragment =
        non_blank(query).ok_or_else(|| AppError::invalid("Search query is required"))?;

    let found = users.search_users(fragment, &caller.id).await?;
    Ok(found.into_iter().map(UserSummary::from).collect())
}
