//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;

use actix_web::{HttpRequest, HttpResponse, web};

use crate::middleware::error::{AppError, AppResult, json_config, path_config, query_config};
use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::state::AppState;

/// Configure all application routes.
///
/// Unknown paths and unsupported methods answer with problem bodies like
/// every other error.
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    let limit = RateLimitMiddleware::new(
        state.auth_limiter.clone(),
        state.trust_forwarded_headers,
    );

    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        // Public routes
        .service(
            web::resource("/health")
                .route(web::get().to(health::health_check))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::scope("/api/v1")
                // Auth routes; credential endpoints are rate limited
                .service(
                    web::scope("/auth")
                        .service(
                            web::resource("/register")
                                .wrap(limit.clone())
                                .route(web::post().to(auth::register))
                                .default_service(web::to(method_not_allowed)),
                        )
                        .service(
                            web::resource("/login")
                                .wrap(limit)
                                .route(web::post().to(auth::login))
                                .default_service(web::to(method_not_allowed)),
                        )
                        .service(
                            web::resource("/me")
                                .route(web::get().to(auth::me))
                                .default_service(web::to(method_not_allowed)),
                        ),
                )
                // Post routes
                .service(
                    web::scope("/posts")
                        .service(
                            web::resource("")
                                .route(web::get().to(posts::list))
                                .route(web::post().to(posts::create))
                                .default_service(web::to(method_not_allowed)),
                        )
                        .service(
                            web::resource("/{id}")
                                .route(web::get().to(posts::get))
                                .route(web::put().to(posts::update))
                                .route(web::delete().to(posts::delete))
                                .default_service(web::to(method_not_allowed)),
                        ),
                ),
        )
        .default_service(web::to(not_found));
}

async fn not_found(req: HttpRequest) -> AppResult<HttpResponse> {
    Err(AppError::NotFound(format!("No route for {}", req.path())))
}

async fn method_not_allowed(req: HttpRequest) -> AppResult<HttpResponse> {
    Err(AppError::MethodNotAllowed(format!(
        "{} is not supported on {}",
        req.method(),
        req.path()
    )))
}
