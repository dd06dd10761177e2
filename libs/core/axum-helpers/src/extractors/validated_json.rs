//! JSON body extractor validated with the `validator` crate.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that has passed [`Validate`].
///
/// Malformed JSON is rejected with the extractor's own status; failed
/// validation is rejected with 400 and the field errors as `details`.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct LoginRequest {
///     #[validate(email)]
///     email: String,
/// }
///
/// async fn login(ValidatedJson(input): ValidatedJson<LoginRequest>) -> String {
///     input.email
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}
