use crate::{Context, Engine, ResponseRecorder};
use anyhow::{Error, Result};
use hyper::{
	body::Body,
	http::{header::CONTENT_TYPE, request::Parts, Method, StatusCode},
	service::Service,
};
use std::{
	convert::Infallible,
	future::{ready, Future, Ready},
	net::SocketAddr,
	pin::Pin,
	sync::Arc,
	task::{Context as TaskContext, Poll},
};

pub use hyper;

pub type Request = hyper::Request<Body>;

fn default_error_handler(e: Error) -> hyper::Response<Body> {
	let mut response = hyper::Response::new(Body::from(e.to_string()));
	*response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
	response
}

/// Only urlencoded `POST`, `PUT` and `PATCH` bodies are read as form values.
fn has_form_body(parts: &Parts) -> bool {
	if !matches!(parts.method, Method::POST | Method::PUT | Method::PATCH) {
		return false;
	}

	parts
		.headers
		.get(CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| value.split(';').next())
		.map_or(false, |essence| {
			essence
				.trim()
				.eq_ignore_ascii_case("application/x-www-form-urlencoded")
		})
}

/// A function that can convert an error into a response.
pub type ErrorHandler = fn(e: Error) -> hyper::Response<Body>;

/// Serves an [`Engine`] over hyper.
///
/// Pass it to `hyper::Server::serve` or call [`HttpEngine::serve`].
pub struct HttpEngine {
	engine: Arc<Engine>,
	internal_error: ErrorHandler,
}

impl From<Engine> for HttpEngine {
	fn from(engine: Engine) -> Self {
		Self {
			engine: Arc::new(engine),
			internal_error: default_error_handler,
		}
	}
}

impl HttpEngine {
	/// Replace the handler used for unreadable request bodies and panics no middleware recovered.
	pub fn internal_error_handler(mut self, handler: ErrorHandler) -> Self {
		self.internal_error = handler;
		self
	}

	/// Bind `addr` and serve until the server fails.
	pub async fn serve(self, addr: &SocketAddr) -> Result<()> {
		let server = hyper::Server::try_bind(addr)?.serve(self);
		tracing::info!(addr = %server.local_addr(), "listening");
		server.await?;
		Ok(())
	}
}

impl<T> Service<T> for HttpEngine {
	type Response = RouteHandler;
	type Error = Infallible;
	type Future = Ready<Result<Self::Response, Self::Error>>;

	fn poll_ready(&mut self, _: &mut TaskContext) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, _: T) -> Self::Future {
		ready(Ok(RouteHandler {
			engine: Arc::clone(&self.engine),
			internal_error: self.internal_error,
		}))
	}
}

/// Responsible for handling the actual HTTP requests from hyper.
pub struct RouteHandler {
	engine: Arc<Engine>,
	internal_error: ErrorHandler,
}

impl Service<Request> for RouteHandler {
	type Response = hyper::Response<Body>;
	type Error = Infallible;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

	fn poll_ready(&mut self, _cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, req: Request) -> Self::Future {
		let engine = Arc::clone(&self.engine);
		let err = self.internal_error;

		Box::pin(async move {
			let (parts, body) = req.into_parts();
			let mut c = Context::new(parts.method.clone(), parts.uri.path())
				.with_query(parts.uri.query());

			if has_form_body(&parts) {
				match hyper::body::to_bytes(body).await {
					Ok(body) => c = c.with_form(body.to_vec()),
					Err(e) => return Ok(err(e.into())),
				}
			}

			let mut recorder = ResponseRecorder::new();

			let response = match engine.dispatch(c, &mut recorder) {
				Ok(()) => recorder
					.into_response()
					.map(|response| response.map(Body::from))
					.unwrap_or_else(|| hyper::Response::new(Body::empty())),
				Err(fault) => err(fault.into()),
			};
			Ok(response)
		})
	}
}

#[cfg(test)]
mod test {
	use super::{HttpEngine, Request};
	use crate::Engine;
	use hyper::{
		body,
		http::{header::CONTENT_TYPE, StatusCode},
		service::Service,
		Body, Method,
	};

	fn engine() -> Engine {
		let mut engine = Engine::new();
		engine
			.get("/hello/:name", |c| {
				let body = format!("hello {} {}", c.param("name"), c.query("lang"));
				c.string(StatusCode::OK, body)
			})
			.post("/login", |c| {
				let body = format!("{} {}", c.post_form("user"), c.post_form("next"));
				c.string(StatusCode::OK, body)
			})
			.get("/panic", |_| panic!("boom"));
		engine
	}

	async fn send(app: &mut HttpEngine, req: Request) -> (StatusCode, String) {
		let mut handler = app.call(()).await.unwrap();
		let response = handler.call(req).await.unwrap();
		let status = response.status();
		let bytes = body::to_bytes(response.into_body()).await.unwrap();
		(status, String::from_utf8(bytes.to_vec()).unwrap())
	}

	fn request(method: Method, uri: &str, body: &'static str) -> Request {
		hyper::Request::builder()
			.method(method)
			.uri(uri)
			.body(Body::from(body))
			.unwrap()
	}

	fn form(method: Method, uri: &str, body: &'static str) -> Request {
		hyper::Request::builder()
			.method(method)
			.uri(uri)
			.header(CONTENT_TYPE, "application/x-www-form-urlencoded; charset=utf-8")
			.body(Body::from(body))
			.unwrap()
	}

	#[tokio::test]
	async fn reads_form_only_when_urlencoded() {
		let mut app = HttpEngine::from(engine());

		assert_eq!(
			send(&mut app, request(Method::POST, "/login?user=query", "user=body")).await,
			(StatusCode::OK, "query ".to_owned())
		);
		assert_eq!(
			send(&mut app, form(Method::POST, "/login?user=query", "user=body")).await,
			(StatusCode::OK, "body ".to_owned())
		);
	}

	#[tokio::test]
	async fn serves_routes() {
		let mut app = HttpEngine::from(engine());

		assert_eq!(
			send(&mut app, request(Method::GET, "/hello/geektutu?lang=go", "")).await,
			(StatusCode::OK, "hello geektutu go".to_owned())
		);
		assert_eq!(
			send(&mut app, form(Method::POST, "/login?next=/home", "user=geektutu")).await,
			(StatusCode::OK, "geektutu /home".to_owned())
		);
		assert_eq!(
			send(&mut app, request(Method::GET, "/nomatch", "")).await,
			(StatusCode::NOT_FOUND, "404 NOT FOUND: /nomatch".to_owned())
		);
	}

	#[tokio::test]
	async fn converts_faults() {
		let mut app = HttpEngine::from(engine());
		let (status, body) = send(&mut app, request(Method::GET, "/panic", "")).await;

		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(body, "handler for GET /panic panicked: boom");
	}

	#[tokio::test]
	async fn uses_custom_error_handler() {
		let mut app = HttpEngine::from(engine()).internal_error_handler(|_| {
			let mut response = hyper::Response::new(Body::from("oops"));
			*response.status_mut() = StatusCode::SERVICE_UNAVAILABLE;
			response
		});
		let (status, body) = send(&mut app, request(Method::GET, "/panic", "")).await;

		assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
		assert_eq!(body, "oops");
	}
}
