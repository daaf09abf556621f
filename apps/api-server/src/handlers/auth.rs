//! Authentication handlers.

use actix_web::{HttpResponse, web};

use scribe_core::domain::Registration;
use scribe_shared::dto::{LoginRequest, LoginResponse, RegisterRequest};

use crate::mapping::user_response;
use crate::middleware::auth::CurrentUser;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let registration =
        Registration::new(&req.email, &req.password, &req.first_name, &req.last_name)?;

    let user = state.users.register(registration).await?;

    Ok(HttpResponse::Ok().json(user_response(&user)))
}

/// POST /api/v1/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state.auth.login(&req.email, &req.password).await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token: session.token,
        token_type: "Bearer".to_string(),
        expires_in: session.expires_in,
        user: user_response(&session.user),
    }))
}

/// GET /api/v1/auth/me - Protected route
pub async fn me(CurrentUser(user): CurrentUser) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(user_response(&user)))
}
