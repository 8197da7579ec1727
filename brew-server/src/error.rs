//! Unified service-layer error type for brew-server
//!
//! `ServiceError` bridges DB-layer errors (`sqlx::Error`, `BoxError`) and the
//! API-layer error (`AppError`) so handlers can use `?` on both.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error
///
/// - `Db`: database or infrastructure errors (logged, mapped to InternalError)
/// - `App`: business-rule errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    App(AppError),
}

/// Postgres unique_violation
const PG_UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e
            && db.code().as_deref() == Some(PG_UNIQUE_VIOLATION)
        {
            let constraint = db.constraint().unwrap_or("unique").to_string();
            tracing::warn!(constraint = %constraint, "Unique constraint violated");
            return ServiceError::App(
                AppError::with_message(ErrorCode::AlreadyExists, "Resource already exists")
                    .with_detail("constraint", constraint),
            );
        }
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

// Domain rule violations from `shared` are client errors
macro_rules! domain_error {
    ($($ty:ty),* $(,)?) => {$(
        impl From<$ty> for ServiceError {
            fn from(e: $ty) -> Self {
                ServiceError::App(e.into())
            }
        }
    )*};
}

domain_error!(
    shared::booking::BookingError,
    shared::order::PricingError,
    shared::order::TransitionError,
);

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Map an infrastructure failure to InternalError, logging the cause
pub fn internal(e: impl std::fmt::Display) -> AppError {
    tracing::error!("Internal error: {e}");
    AppError::new(ErrorCode::InternalError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_passes_through() {
        let err: ServiceError = AppError::new(ErrorCode::CafeNotFound).into();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::CafeNotFound);
    }

    #[test]
    fn test_db_error_is_hidden() {
        let err: ServiceError = sqlx::Error::RowNotFound.into();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::DatabaseError);
        assert_eq!(app.http_status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_transition_error_is_conflict() {
        use shared::models::Role;
        use shared::order::{OrderStatus, authorize_transition};

        let err: ServiceError =
            authorize_transition(Role::Chef, OrderStatus::Confirmed, OrderStatus::Ready)
                .unwrap_err()
                .into();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::InvalidTransition);
        assert_eq!(app.http_status(), http::StatusCode::CONFLICT);
    }

    #[test]
    fn test_internal_helper() {
        assert_eq!(internal("boom").code, ErrorCode::InternalError);
    }
}
