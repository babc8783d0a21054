//! Tower plumbing that runs a [`Guard`] in front of a route
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use extras::guards::require_headers;
//!
//! let app: Router = Router::new()
//!     .route("/api/items", get(list_items))
//!     .route_layer(require_headers(["X-Api-Key"]));
//! ```

use crate::core::error::{ExtrasResult, RequestError};
use crate::core::guard::Guard;
use crate::core::request::RequestView;
use axum::body::{Body, Bytes};
use axum::extract::multipart::MultipartError;
use axum::extract::{Form, FromRequest, Multipart, Request};
use axum::http::{HeaderMap, Method, header, request::Parts};
use axum::response::{IntoResponse, Response};
use futures::future::BoxFuture;
use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Default cap on a buffered form body
pub const DEFAULT_FORM_BODY_LIMIT: usize = 2 * 1024 * 1024;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Layer wrapping a route with a guard
pub struct GuardLayer<G> {
    guard: Arc<G>,
    body_limit: usize,
}

impl<G> Clone for GuardLayer<G> {
    fn clone(&self) -> Self {
        Self {
            guard: self.guard.clone(),
            body_limit: self.body_limit,
        }
    }
}

impl<G: Guard> GuardLayer<G> {
    pub fn new(guard: G) -> Self {
        Self {
            guard: Arc::new(guard),
            body_limit: DEFAULT_FORM_BODY_LIMIT,
        }
    }

    /// Maximum number of body bytes buffered when a form is inspected
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    pub fn guard(&self) -> &G {
        &self.guard
    }
}

impl<S, G> Layer<S> for GuardLayer<G> {
    type Service = GuardService<S, G>;

    fn layer(&self, inner: S) -> Self::Service {
        GuardService {
            inner,
            guard: self.guard.clone(),
            body_limit: self.body_limit,
        }
    }
}

/// Service produced by [`GuardLayer`]
pub struct GuardService<S, G> {
    inner: S,
    guard: Arc<G>,
    body_limit: usize,
}

impl<S: Clone, G> Clone for GuardService<S, G> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            guard: self.guard.clone(),
            body_limit: self.body_limit,
        }
    }
}

impl<S, G> Service<Request> for GuardService<S, G>
where
    S: Service<Request, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send + 'static,
    G: Guard,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        // The clone is not driven to readiness; swap so the ready one is used.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let guard = self.guard.clone();
        let body_limit = self.body_limit;

        Box::pin(async move {
            let (parts, body) = req.into_parts();

            let (view, body) = match inspect(&parts, body, guard.as_ref(), body_limit).await {
                Ok(inspected) => inspected,
                Err(err) => {
                    tracing::warn!(path = %parts.uri.path(), error = %err, "unreadable request body");
                    return Ok(err.into_response());
                }
            };

            if let Err(err) = guard.check(&view) {
                tracing::warn!(
                    path = %view.path(),
                    method = %view.method(),
                    guard = guard.name(),
                    code = err.error_code(),
                    error = %err,
                    "request rejected by guard"
                );
                return Ok(err.into_response());
            }

            tracing::debug!(path = %view.path(), guard = guard.name(), "guard passed");

            let response = inner.call(Request::from_parts(parts, body)).await?;
            Ok(response.into_response())
        })
    }
}

/// Build the request view, buffering the form body only when asked to
async fn inspect<G: Guard>(
    parts: &Parts,
    body: Body,
    guard: &G,
    body_limit: usize,
) -> ExtrasResult<(RequestView, Body)> {
    let view = RequestView::from_parts(parts);
    if !guard.needs_form(&view) {
        return Ok((view, body));
    }

    let bytes = axum::body::to_bytes(body, body_limit)
        .await
        .map_err(|e| RequestError::UnreadableBody {
            message: e.to_string(),
        })?;
    let fields = decode_form(parts, &bytes).await?;

    Ok((view.with_form(fields), Body::from(bytes)))
}

/// Media type of the request, lowercased and without parameters
fn media_type(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    let essence = value.split(';').next().unwrap_or_default().trim();
    Some(essence.to_ascii_lowercase())
}

/// Rebuild a POST request over the buffered body for an axum extractor
///
/// Headers and extensions are carried over so the boundary and any body
/// limit configured on the router still apply.
fn replay(parts: &Parts, bytes: &Bytes) -> Request {
    let mut req = Request::new(Body::from(bytes.clone()));
    *req.method_mut() = Method::POST;
    *req.headers_mut() = parts.headers.clone();
    *req.extensions_mut() = parts.extensions.clone();
    req
}

/// Decode the form fields of a buffered body
///
/// Urlencoded and multipart bodies are understood; any other content type
/// carries no form fields. File parts of a multipart body are not form
/// fields.
async fn decode_form(parts: &Parts, bytes: &Bytes) -> ExtrasResult<Vec<(String, String)>> {
    match media_type(&parts.headers).as_deref() {
        Some(FORM_URLENCODED) => {
            let req = replay(parts, bytes);
            let Form(fields) = Form::<Vec<(String, String)>>::from_request(req, &())
                .await
                .map_err(|e| RequestError::UnreadableBody {
                    message: e.body_text(),
                })?;
            Ok(fields)
        }
        Some(MULTIPART_FORM_DATA) => decode_multipart(replay(parts, bytes)).await,
        _ => Ok(Vec::new()),
    }
}

async fn decode_multipart(req: Request) -> ExtrasResult<Vec<(String, String)>> {
    let mut multipart = Multipart::from_request(req, &())
        .await
        .map_err(|e| RequestError::UnreadableBody {
            message: e.body_text(),
        })?;

    let unreadable = |e: MultipartError| RequestError::UnreadableBody {
        message: e.body_text(),
    };

    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(unreadable)? {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let value = field.text().await.map_err(unreadable)?;
        fields.push((name, value));
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_parts(content_type: &str) -> Parts {
        let (parts, _) = Request::builder()
            .method(Method::POST)
            .header(header::CONTENT_TYPE, content_type)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[tokio::test]
    async fn test_decode_form_urlencoded() {
        let parts = post_parts(FORM_URLENCODED);
        let bytes = Bytes::from_static(b"name=Ada&address=London");

        let fields = decode_form(&parts, &bytes).await.unwrap();
        assert_eq!(
            fields,
            vec![
                ("name".to_string(), "Ada".to_string()),
                ("address".to_string(), "London".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_media_type_ignores_case_and_parameters() {
        let parts = post_parts("Application/X-WWW-Form-Urlencoded; charset=UTF-8");
        assert_eq!(media_type(&parts.headers).as_deref(), Some(FORM_URLENCODED));

        let bytes = Bytes::from_static(b"name=Ada");
        let fields = decode_form(&parts, &bytes).await.unwrap();
        assert_eq!(fields, vec![("name".to_string(), "Ada".to_string())]);
    }

    #[tokio::test]
    async fn test_decode_multipart_skips_file_parts() {
        let parts = post_parts("multipart/form-data; boundary=XYZ");
        let bytes = Bytes::from_static(
            b"--XYZ\r\n\
Content-Disposition: form-data; name=\"name\"\r\n\r\n\
Ada\r\n\
--XYZ\r\n\
Content-Disposition: form-data; name=\"upload\"; filename=\"cv.txt\"\r\n\
Content-Type: text/plain\r\n\r\n\
hello\r\n\
--XYZ--\r\n",
        );

        let fields = decode_form(&parts, &bytes).await.unwrap();
        assert_eq!(fields, vec![("name".to_string(), "Ada".to_string())]);
    }

    #[tokio::test]
    async fn test_decode_form_other_content_type_is_empty() {
        let parts = post_parts("application/json");
        let bytes = Bytes::from_static(b"{\"name\":\"Ada\"}");

        assert!(decode_form(&parts, &bytes).await.unwrap().is_empty());
    }
}
