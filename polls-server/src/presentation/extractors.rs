use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{Error, FromRequest, HttpRequest, error::ErrorUnauthorized, web};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;

/// The user behind a valid `Authorization: Bearer` token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let auth_service = req.app_data::<web::Data<AuthService>>().cloned();
        let token = bearer_token(req);

        Box::pin(async move {
            let auth_service = auth_service
                .ok_or_else(|| actix_web::error::ErrorInternalServerError("AuthService missing"))?;
            let token = token.ok_or_else(|| ErrorUnauthorized("missing bearer token"))?;

            let claims = auth_service
                .keys()
                .verify_token(&token)
                .map_err(|_| ErrorUnauthorized("invalid token"))?;
            let user_id =
                Uuid::parse_str(&claims.sub).map_err(|_| ErrorUnauthorized("invalid token"))?;
            let user = auth_service
                .get_user(user_id)
                .await
                .map_err(|err| match err {
                    DomainError::UserNotFound(_) => ErrorUnauthorized("user not found"),
                    other => Error::from(other),
                })?;

            Ok(AuthenticatedUser {
                id: user.id,
                username: user.username,
            })
        })
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}
