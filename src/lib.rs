//! A small HTTP dispatch core: trie routing, route groups and onion middleware, built on hyper.
//!
//! ```
//! use geode::{Engine, Method, ResponseRecorder, StatusCode};
//!
//! let mut engine = Engine::with_default_middleware();
//! engine.get("/hello/:name", |c| {
//! 	let body = format!("hello {}", c.param("name"));
//! 	c.string(StatusCode::OK, body);
//! });
//!
//! let mut v1 = engine.group("/v1");
//! v1.use_middleware(|c| {
//! 	// before the route
//! 	c.next();
//! 	// after the route
//! });
//! v1.get("/assets/*filepath", |c| {
//! 	let file = c.param("filepath").to_owned();
//! 	c.string(StatusCode::OK, file);
//! });
//!
//! let mut recorder = ResponseRecorder::new();
//! engine.serve(Method::GET, "/hello/geektutu", &mut recorder)?;
//! assert_eq!(recorder.body_str(), "hello geektutu");
//! # Ok::<(), geode::Fault>(())
//! ```
//!
//! Path segments starting with `:` match any single segment and `*` matches the rest of the path.
//! When several routes could match, the one whose segment was registered first wins; routes are
//! not ranked by how specific they are.
//!
//! Middleware is any handler that calls [`Context::next`]. The middleware of every group whose
//! prefix starts the request path runs, in the order the groups were created, around the route
//! handler. Requests with no route still pass through that middleware and end in a 404.
//!
//! With the `server` feature (on by default) an engine can be served over hyper with
//! [`HttpEngine`].

#[cfg(feature = "server")]
mod server;
#[cfg(feature = "server")]
pub use server::*;

mod context;
mod engine;
mod error;
mod group;
mod middleware;
mod response;
mod trie;

/// Types and utilities for defining routes and route handlers.
pub mod route;

/// Registration and lookup of routes.
pub mod router;

pub use context::Context;
pub use engine::Engine;
pub use error::{panic_message, Fault};
pub use group::{GroupId, RouterGroup};
pub use http::{header, HeaderMap, Method, StatusCode};
pub use middleware::{logger, recovery};
pub use response::{ResponseRecorder, ResponseSink};
pub use route::*;
pub use router::Router;
pub use trie::RouteNode;
