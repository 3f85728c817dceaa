use actix_web::{dev::Payload, FromRequest, HttpRequest};
use campaign_platform_shared::constants::USER_ID_HEADER;
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;

/// Caller identity forwarded by the upstream gateway in the `X-User-Id` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl AuthenticatedUser {
    pub fn from_request_headers(req: &HttpRequest) -> Result<Self, AppError> {
        let value = req
            .headers()
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::Authentication("Missing user identity".to_string()))?;

        let user_id = value
            .to_str()
            .ok()
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .ok_or_else(|| AppError::Authentication("Malformed user identity".to_string()))?;

        Ok(Self { user_id })
    }
}

/// Implement FromRequest for AuthenticatedUser to use as handler parameter
impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(AuthenticatedUser::from_request_headers(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn reads_uuid_from_header() {
        let id = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, id.to_string()))
            .to_http_request();

        assert_eq!(AuthenticatedUser::from_request_headers(&req).unwrap().user_id, id);
    }

    #[test]
    fn missing_or_garbage_header_is_unauthenticated() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(
            AuthenticatedUser::from_request_headers(&req),
            Err(AppError::Authentication(_))
        ));

        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "user-42"))
            .to_http_request();
        assert!(matches!(
            AuthenticatedUser::from_request_headers(&req),
            Err(AppError::Authentication(_))
        ));
    }
}
