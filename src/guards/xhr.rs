//! Restrict a route to AJAX requests

use crate::core::error::{ExtrasResult, RequestError};
use crate::core::guard::Guard;
use crate::core::request::RequestView;
use axum::http::StatusCode;

/// Aborts non-AJAX requests with a fixed status (415 by default)
#[derive(Debug, Clone, Copy)]
pub struct XhrOnly {
    status: StatusCode,
}

impl XhrOnly {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(status: StatusCode) -> Self {
        Self { status }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl Default for XhrOnly {
    fn default() -> Self {
        Self {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }
}

impl Guard for XhrOnly {
    fn name(&self) -> &'static str {
        "xhr_only"
    }

    fn check(&self, view: &RequestView) -> ExtrasResult<()> {
        if view.is_xhr() {
            Ok(())
        } else {
            Err(RequestError::Aborted {
                status: self.status,
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request::RequestViewBuilder;
    use axum::http::Method;

    #[test]
    fn test_default_status_is_415() {
        let view = RequestViewBuilder::new(Method::GET).build();
        let err = XhrOnly::new().check(&view).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_custom_status() {
        let view = RequestViewBuilder::new(Method::GET).build();
        let err = XhrOnly::with_status(StatusCode::FORBIDDEN)
            .check(&view)
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_xhr_request_passes() {
        let view = RequestViewBuilder::new(Method::GET).xhr(true).build();
        assert!(XhrOnly::new().check(&view).is_ok());
    }
}
