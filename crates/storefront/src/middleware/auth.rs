//! Mock sign-in extractor and helpers.
//!
//! Nothing is verified. The stored user record only decides whether the
//! profile page shows the sign-in form or the profile.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::CurrentUser;
use crate::storage::{Storage, StorageError};

/// Extractor that optionally gets the signed-in user.
///
/// A missing session, a store failure, or a corrupt user record all count
/// as signed out.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(OptionalUser(user): OptionalUser) -> impl IntoResponse {
///     match user {
///         Some(u) => format!("Hello, {}!", u.display_name()),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => Storage::new(session.clone())
                .user()
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Failed to read signed-in user");
                    None
                }),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Store `user` as the signed-in visitor.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_in(storage: &Storage, user: &CurrentUser) -> Result<(), StorageError> {
    storage.save_user(user).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "Visitor signed in");
    Ok(())
}

/// Forget the signed-in visitor.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_out(storage: &Storage) -> Result<(), StorageError> {
    storage.remove_user().await?;
    clear_sentry_user();
    Ok(())
}
