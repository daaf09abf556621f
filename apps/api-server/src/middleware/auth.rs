//! Authentication extractors.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;

use scribe_core::domain::User;
use scribe_core::ports::AuthError;

use super::error::AppError;
use crate::state::AppState;

/// The authenticated caller, resolved from the `Authorization: Bearer` header.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn me(CurrentUser(user): CurrentUser) -> impl Responder {
///     format!("Hello, {}!", user.email)
/// }
/// ```
///
/// Declare it before body and path extractors so an unauthenticated request is
/// rejected with 401 before its payload is validated.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
            tracing::error!("AppState not found in app data");
            return Box::pin(async {
                Err(AppError::Internal("Server configuration error".to_string()))
            });
        };

        let token = bearer_token(req);

        Box::pin(async move {
            let token = token.map_err(|e| AppError::Unauthorized(e.to_string()))?;
            let user = state.auth.current_user(&token).await?;
            Ok(CurrentUser(user))
        })
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
fn bearer_token(req: &HttpRequest) -> Result<String, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))?;

    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(AuthError::InvalidToken("Expected Bearer token".to_string()));
    }

    Ok(token.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_token_parsing() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req).unwrap(), "abc.def.ghi");

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "bearer abc"))
            .to_http_request();
        assert_eq!(bearer_token(&req).unwrap(), "abc");
    }

    #[test]
    fn test_missing_header() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(bearer_token(&req), Err(AuthError::MissingAuth)));
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwdw=="))
            .to_http_request();
        assert!(matches!(bearer_token(&req), Err(AuthError::InvalidToken(_))));

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer "))
            .to_http_request();
        assert!(bearer_token(&req).is_err());
    }
}
