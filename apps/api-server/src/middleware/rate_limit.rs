//! Rate limiting middleware.

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures::future::LocalBoxFuture;
use scribe_shared::ErrorResponse;
use std::future::{Ready, ready};
use std::net::SocketAddr;
use std::rc::Rc;
use std::sync::Arc;

use scribe_core::ports::{RateLimitDecision, RateLimiter};

/// Rate limiting middleware factory.
///
/// Requests are keyed by the IP of the connecting peer. `X-Forwarded-For` and
/// `Forwarded` are only honoured when `trust_forwarded` is set, since any
/// client can send them. Without a limiter every request passes.
#[derive(Clone)]
pub struct RateLimitMiddleware {
    limiter: Option<Arc<dyn RateLimiter>>,
    trust_forwarded: bool,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Option<Arc<dyn RateLimiter>>, trust_forwarded: bool) -> Self {
        Self {
            limiter,
            trust_forwarded,
        }
    }
}

/// Limiter key for a request: the client IP without its port.
fn client_key(req: &ServiceRequest, trust_forwarded: bool) -> String {
    let forwarded = trust_forwarded
        .then(|| req.connection_info().realip_remote_addr().map(str::to_owned))
        .flatten();

    match forwarded {
        Some(addr) => addr
            .parse::<SocketAddr>()
            .map(|a| a.ip().to_string())
            .unwrap_or(addr),
        None => req
            .peer_addr()
            .map(|a| a.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string()),
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            trust_forwarded: self.trust_forwarded,
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    limiter: Option<Arc<dyn RateLimiter>>,
    trust_forwarded: bool,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        let Some(limiter) = self.limiter.clone() else {
            return Box::pin(async move { Ok(service.call(req).await?.map_into_left_body()) });
        };

        let key = client_key(&req, self.trust_forwarded);

        Box::pin(async move {
            match limiter.check(&key).await {
                Ok(RateLimitDecision::Limited { retry_after }) => {
                    let retry_after = retry_after.as_secs().max(1);
                    tracing::warn!(client = %key, retry_after, "Rate limit exceeded");

                    let error = ErrorResponse::too_many_requests(format!(
                        "Rate limit exceeded. Try again in {retry_after} seconds."
                    ));
                    let response = HttpResponse::TooManyRequests()
                        .insert_header(("X-RateLimit-Remaining", "0"))
                        .insert_header(("Retry-After", retry_after.to_string()))
                        .json(error);

                    return Ok(req.into_response(response).map_into_right_body());
                }
                Ok(RateLimitDecision::Allowed) => {}
                Err(e) => tracing::error!(error = %e, "Rate limiter error, failing open"),
            }

            Ok(service.call(req).await?.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn peer() -> SocketAddr {
        "127.0.0.1:5000".parse().unwrap()
    }

    #[test]
    fn test_key_ignores_forwarded_headers_by_default() {
        let req = TestRequest::default()
            .peer_addr(peer())
            .insert_header(("X-Forwarded-For", "10.0.0.1"))
            .to_srv_request();

        assert_eq!(client_key(&req, false), "127.0.0.1");
    }

    #[test]
    fn test_key_uses_forwarded_header_when_trusted() {
        let req = TestRequest::default()
            .peer_addr(peer())
            .insert_header(("X-Forwarded-For", "10.0.0.1"))
            .to_srv_request();

        assert_eq!(client_key(&req, true), "10.0.0.1");
    }

    #[test]
    fn test_trusted_key_without_header_drops_port() {
        let req = TestRequest::default().peer_addr(peer()).to_srv_request();

        assert_eq!(client_key(&req, true), "127.0.0.1");
    }

    #[test]
    fn test_key_without_peer_is_shared() {
        let req = TestRequest::default().to_srv_request();

        assert_eq!(client_key(&req, false), "unknown");
    }
}
