//! Per-request view consumed by guards
//!
//! A [`RequestView`] is built fresh for every request from the axum request
//! parts. It only records what guards look at: header names, cookie names,
//! query args, form fields, the method and the AJAX flag.

use axum::extract::Query;
use axum::http::{HeaderMap, Method, header, request::Parts};

/// Header carrying the AJAX signal
pub const X_REQUESTED_WITH: &str = "x-requested-with";

/// Value of [`X_REQUESTED_WITH`] sent by client-side script
pub const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

/// Snapshot of the request data guards check against
#[derive(Debug, Clone, Default)]
pub struct RequestView {
    method: Method,
    path: String,
    header_names: Vec<String>,
    cookies: Vec<(String, String)>,
    args: Vec<(String, String)>,
    form: Option<Vec<(String, String)>>,
    is_xhr: bool,
}

impl RequestView {
    /// Build a view from request parts
    ///
    /// Form fields are not read here: the body is only buffered when a guard
    /// asks for it, see [`RequestView::with_form`].
    pub fn from_parts(parts: &Parts) -> Self {
        let args = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map(|Query(args)| args)
            .unwrap_or_default();

        Self {
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            header_names: parts
                .headers
                .keys()
                .map(|name| name.as_str().to_string())
                .collect(),
            cookies: parse_cookies(&parts.headers),
            args,
            form: None,
            is_xhr: is_xhr(&parts.headers),
        }
    }

    /// Attach decoded form fields
    pub fn with_form(mut self, fields: Vec<(String, String)>) -> Self {
        self.form = Some(fields);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_post(&self) -> bool {
        self.method == Method::POST
    }

    /// Whether the request was issued by client-side script
    pub fn is_xhr(&self) -> bool {
        self.is_xhr
    }

    /// Header names, lowercase as stored by `http`
    pub fn header_names(&self) -> impl Iterator<Item = &str> {
        self.header_names.iter().map(String::as_str)
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.header_names
            .iter()
            .any(|present| present.eq_ignore_ascii_case(name))
    }

    pub fn cookie_names(&self) -> impl Iterator<Item = &str> {
        self.cookies.iter().map(|(name, _)| name.as_str())
    }

    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookie_names().any(|present| present == name)
    }

    pub fn arg_names(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(|(name, _)| name.as_str())
    }

    /// First value of a query argument
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Form field names, empty when the body was not read
    pub fn form_names(&self) -> impl Iterator<Item = &str> {
        self.form
            .iter()
            .flatten()
            .map(|(name, _)| name.as_str())
    }

    pub fn has_form_field(&self, name: &str) -> bool {
        self.form_names().any(|present| present == name)
    }
}

/// Builder used by tests and by callers that assemble views by hand
#[derive(Debug, Default)]
pub struct RequestViewBuilder {
    view: RequestView,
}

impl RequestViewBuilder {
    pub fn new(method: Method) -> Self {
        Self {
            view: RequestView {
                method,
                path: "/".to_string(),
                ..RequestView::default()
            },
        }
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.view.path = path.into();
        self
    }

    pub fn header(mut self, name: &str) -> Self {
        self.view.header_names.push(name.to_ascii_lowercase());
        self
    }

    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.view.cookies.push((name.into(), value.into()));
        self
    }

    pub fn arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.view.args.push((name.into(), value.into()));
        self
    }

    pub fn form_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.view
            .form
            .get_or_insert_with(Vec::new)
            .push((name.into(), value.into()));
        self
    }

    pub fn xhr(mut self, is_xhr: bool) -> Self {
        self.view.is_xhr = is_xhr;
        self
    }

    pub fn build(self) -> RequestView {
        self.view
    }
}

fn is_xhr(headers: &HeaderMap) -> bool {
    headers
        .get(X_REQUESTED_WITH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim().eq_ignore_ascii_case(XML_HTTP_REQUEST))
}

/// Parse every `Cookie` header into `(name, value)` pairs
fn parse_cookies(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().trim_matches('"').to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(req: Request<()>) -> Parts {
        req.into_parts().0
    }

    #[test]
    fn test_from_parts_collects_query_args_in_order() {
        let p = parts(
            Request::get("/items?paginate=true&page=2&page=3")
                .body(())
                .unwrap(),
        );
        let view = RequestView::from_parts(&p);

        assert_eq!(
            view.arg_names().collect::<Vec<_>>(),
            vec!["paginate", "page", "page"]
        );
        assert_eq!(view.arg("page"), Some("2"));
        assert_eq!(view.arg("missing"), None);
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let p = parts(Request::get("/").header("X-Foo", "1").body(()).unwrap());
        let view = RequestView::from_parts(&p);

        assert!(view.has_header("X-Foo"));
        assert!(view.has_header("x-foo"));
        assert!(!view.has_header("X-Bar"));
    }

    #[test]
    fn test_cookies_parsed_from_multiple_headers() {
        let p = parts(
            Request::get("/")
                .header("Cookie", "session=abc; csrftoken=xyz")
                .header("Cookie", "theme=\"dark\"")
                .body(())
                .unwrap(),
        );
        let view = RequestView::from_parts(&p);

        assert_eq!(
            view.cookie_names().collect::<Vec<_>>(),
            vec!["session", "csrftoken", "theme"]
        );
        assert!(view.has_cookie("csrftoken"));
        assert!(!view.has_cookie("Session"));
    }

    #[test]
    fn test_xhr_flag() {
        let p = parts(
            Request::get("/")
                .header("X-Requested-With", "xmlhttprequest")
                .body(())
                .unwrap(),
        );
        assert!(RequestView::from_parts(&p).is_xhr());

        let p = parts(Request::get("/").body(()).unwrap());
        assert!(!RequestView::from_parts(&p).is_xhr());
    }

    #[test]
    fn test_form_names_empty_until_attached() {
        let p = parts(Request::post("/").body(()).unwrap());
        let view = RequestView::from_parts(&p);
        assert!(view.is_post());
        assert_eq!(view.form_names().count(), 0);

        let view = view.with_form(vec![("name".into(), "Ada".into())]);
        assert!(view.has_form_field("name"));
    }

    #[test]
    fn test_no_query_string_yields_no_args() {
        let p = parts(Request::get("/items").body(()).unwrap());
        let view = RequestView::from_parts(&p);
        assert_eq!(view.arg_names().count(), 0);
        assert_eq!(view.path(), "/items");
    }
}
