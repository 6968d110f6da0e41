use crate::HandlerFunc;
use http::{
	header::{self, HeaderName, HeaderValue},
	HeaderMap, Method, Response, StatusCode,
};
use serde::Serialize;
use serde_json::json;
use std::{collections::HashMap, sync::Arc};

/// Per-request state: request data, the handler chain with its cursor, and the buffered response.
///
/// A context is built for each incoming request, driven by [`Context::next`], and turned into a
/// response once the chain has returned.
pub struct Context {
	method: Method,
	path: String,
	query: Option<String>,
	form: Vec<u8>,
	params: HashMap<String, String>,

	handlers: Vec<HandlerFunc>,
	index: isize,

	status: Option<StatusCode>,
	headers: HeaderMap,
	body: Vec<u8>,
}

impl Context {
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: None,
			form: vec![],
			params: HashMap::new(),
			handlers: vec![],
			index: -1,
			status: None,
			headers: HeaderMap::new(),
			body: vec![],
		}
	}

	/// Attach the raw query string (without the leading `?`).
	pub fn with_query(mut self, query: Option<&str>) -> Self {
		self.query = query.map(str::to_owned);
		self
	}

	/// Attach an `application/x-www-form-urlencoded` request body.
	pub fn with_form(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.form = body.into();
		self
	}

	pub fn method(&self) -> &Method {
		&self.method
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	/// The value bound to a `:name` or `*name` segment, or `""` if unbound.
	pub fn param(&self, name: &str) -> &str {
		self.params.get(name).map(String::as_str).unwrap_or_default()
	}

	pub fn params(&self) -> &HashMap<String, String> {
		&self.params
	}

	pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
		self.params = params;
	}

	/// The first query value for `key`, or `""`.
	pub fn query(&self, key: &str) -> String {
		self.query
			.as_deref()
			.and_then(|query| find_value(query.as_bytes(), key))
			.unwrap_or_default()
	}

	/// The first form value for `key`, falling back to the query string, or `""`.
	pub fn post_form(&self, key: &str) -> String {
		find_value(&self.form, key).unwrap_or_else(|| self.query(key))
	}

	pub(crate) fn push_handlers(&mut self, handlers: impl IntoIterator<Item = HandlerFunc>) {
		self.handlers.extend(handlers);
	}

	/// Run the rest of the chain.
	///
	/// Handlers may call this from inside their own body: the remaining handlers then run before
	/// control comes back, which is what gives middleware code both before and after the handler.
	/// Calling it on an exhausted chain does nothing.
	pub fn next(&mut self) {
		self.index += 1;
		while self.index < self.len() {
			let handler = Arc::clone(&self.handlers[self.index as usize]);
			handler(&mut *self);
			self.index += 1;
		}
	}

	/// Stop the chain from advancing and replace the response with a JSON error.
	///
	/// Handlers that are already waiting on [`Context::next`] still resume afterwards.
	pub fn fail(&mut self, code: StatusCode, message: &str) {
		self.index = self.len();
		self.status = None;
		self.headers.clear();
		self.body.clear();
		self.json(code, &json!({ "message": message }));
	}

	/// Whether [`Context::fail`] was called or every handler has been entered.
	pub fn is_exhausted(&self) -> bool {
		self.index >= self.len()
	}

	fn len(&self) -> isize {
		self.handlers.len() as isize
	}

	/// The response status so far, `200 OK` if nothing set one.
	pub fn status_code(&self) -> StatusCode {
		self.status.unwrap_or(StatusCode::OK)
	}

	pub fn status(&mut self, code: StatusCode) {
		self.status = Some(code);
	}

	pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
		self.headers.insert(name, value);
	}

	pub fn string(&mut self, code: StatusCode, body: impl AsRef<str>) {
		self.set_header(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
		self.status(code);
		self.body.extend_from_slice(body.as_ref().as_bytes());
	}

	pub fn json<T: Serialize + ?Sized>(&mut self, code: StatusCode, value: &T) {
		match serde_json::to_vec(value) {
			Ok(bytes) => {
				self.set_header(
					header::CONTENT_TYPE,
					HeaderValue::from_static("application/json"),
				);
				self.status(code);
				self.body.extend_from_slice(&bytes);
			}
			Err(e) => {
				tracing::error!(error = %e, path = %self.path, "failed to encode JSON response");
				self.string(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
			}
		}
	}

	pub fn data(&mut self, code: StatusCode, data: &[u8]) {
		self.status(code);
		self.body.extend_from_slice(data);
	}

	pub fn html(&mut self, code: StatusCode, html: impl AsRef<str>) {
		self.set_header(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
		self.status(code);
		self.body.extend_from_slice(html.as_ref().as_bytes());
	}

	pub fn into_response(self) -> Response<Vec<u8>> {
		let mut response = Response::new(self.body);
		*response.status_mut() = self.status.unwrap_or(StatusCode::OK);
		*response.headers_mut() = self.headers;
		response
	}
}

fn find_value(input: &[u8], key: &str) -> Option<String> {
	url::form_urlencoded::parse(input)
		.find(|(k, _)| k == key)
		.map(|(_, v)| v.into_owned())
}
