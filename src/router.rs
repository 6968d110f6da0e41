use crate::{handler, parse_pattern, trie::RouteNode, Context, HandlerFunc};
use http::{Method, StatusCode};
use std::collections::HashMap;

type Roots = HashMap<Method, RouteNode>;
type Handlers = HashMap<(Method, String), HandlerFunc>;

fn default_not_found_handler(c: &mut Context) {
	tracing::debug!(method = %c.method(), path = %c.path(), "no route matched");
	let body = format!("404 NOT FOUND: {}", c.path());
	c.string(StatusCode::NOT_FOUND, body);
}

/// Route table: one tree per method plus the handler registered for each exact pattern.
pub struct Router {
	roots: Roots,
	handlers: Handlers,
	not_found: HandlerFunc,
}

impl Default for Router {
	fn default() -> Self {
		Self {
			roots: Roots::default(),
			handlers: Handlers::default(),
			not_found: handler(default_not_found_handler),
		}
	}
}

impl Router {
	/// Register `route` for `method` and `pattern`.
	///
	/// Patterns are not validated. Registering the same pattern twice replaces the handler.
	pub fn add_route(&mut self, method: Method, pattern: &str, route: HandlerFunc) -> &mut Self {
		tracing::debug!(method = %method, pattern, "route registered");

		let parts = parse_pattern(pattern);
		self.roots
			.entry(method.clone())
			.or_default()
			.insert(pattern, &parts, 0);
		self.handlers.insert((method, pattern.to_owned()), route);
		self
	}

	/// Find the route matching `path`, returning its pattern and the bound parameters.
	pub fn get_route(
		&self,
		method: &Method,
		path: &str,
	) -> Option<(&str, HashMap<String, String>)> {
		let search_parts = parse_pattern(path);
		let node = self.roots.get(method)?.search(&search_parts, 0)?;

		let mut params = HashMap::new();
		for (index, part) in parse_pattern(node.pattern()).into_iter().enumerate() {
			if let Some(name) = part.strip_prefix(':') {
				params.insert(name.to_owned(), search_parts[index].to_owned());
			}
			if let Some(name) = part.strip_prefix('*') {
				if !name.is_empty() {
					params.insert(name.to_owned(), search_parts[index..].join("/"));
				}
				break;
			}
		}

		Some((node.pattern(), params))
	}

	/// Append the matching handler (or the not-found handler) to the context and run the chain.
	pub fn handle(&self, c: &mut Context) {
		let route = self
			.get_route(c.method(), c.path())
			.and_then(|(pattern, params)| {
				let key = (c.method().clone(), pattern.to_owned());
				self.handlers.get(&key).map(|route| (route, params))
			});

		match route {
			Some((route, params)) => {
				c.set_params(params);
				c.push_handlers(Some(route.clone()));
			}
			None => c.push_handlers(Some(self.not_found.clone())),
		}

		c.next();
	}

	/// The route tree for `method`, if anything was registered for it.
	pub fn root(&self, method: &Method) -> Option<&RouteNode> {
		self.roots.get(method)
	}
}

#[cfg(test)]
mod test {
	use super::Router;
	use crate::{handler, Context};
	use http::{Method, StatusCode};
	use std::collections::HashMap;

	fn reply(body: &'static str) -> crate::HandlerFunc {
		handler(move |c| c.string(StatusCode::OK, body))
	}

	fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	fn router() -> Router {
		let mut router = Router::default();
		router
			.add_route(Method::GET, "/", reply("index"))
			.add_route(Method::GET, "/hello/:name", reply("hello"))
			.add_route(Method::GET, "/hello/b/c", reply("c"))
			.add_route(Method::GET, "/hi/:name", reply("hi"))
			.add_route(Method::GET, "/assets/*filepath", reply("assets"))
			.add_route(Method::POST, "/login", reply("login"));
		router
	}

	fn run(router: &Router, method: Method, path: &str) -> http::Response<Vec<u8>> {
		let mut ctx = Context::new(method, path);
		router.handle(&mut ctx);
		ctx.into_response()
	}

	#[test]
	fn adds_routes_per_method() {
		let router = router();

		assert!(router.root(&Method::GET).is_some());
		assert!(router.root(&Method::POST).is_some());
		assert!(router.root(&Method::PUT).is_none());
		assert_eq!(router.handlers.len(), 6);
	}

	#[test]
	fn binds_named_params() {
		let router = router();
		let (pattern, bound) = router.get_route(&Method::GET, "/hello/geektutu").unwrap();

		assert_eq!(pattern, "/hello/:name");
		assert_eq!(bound, params(&[("name", "geektutu")]));
	}

	#[test]
	fn binds_wildcards() {
		let router = router();
		let (pattern, bound) = router
			.get_route(&Method::GET, "/assets/css/app.css")
			.unwrap();

		assert_eq!(pattern, "/assets/*filepath");
		assert_eq!(bound, params(&[("filepath", "css/app.css")]));
	}

	#[test]
	fn bare_wildcard_binds_nothing() {
		let mut router = Router::default();
		router.add_route(Method::GET, "/static/*", reply("static"));
		let (pattern, bound) = router.get_route(&Method::GET, "/static/a/b").unwrap();

		assert_eq!(pattern, "/static/*");
		assert!(bound.is_empty());
	}

	#[test]
	fn separates_methods() {
		let router = router();

		assert!(router.get_route(&Method::GET, "/login").is_none());
		assert!(router.get_route(&Method::POST, "/login").is_some());
		assert!(router.get_route(&Method::DELETE, "/").is_none());
	}

	#[test]
	fn resolution_is_idempotent() {
		let router = router();
		let first = router.get_route(&Method::GET, "/hi/geektutu");

		for _ in 0..3 {
			assert_eq!(router.get_route(&Method::GET, "/hi/geektutu"), first);
		}
	}

	#[test]
	fn first_registered_segment_wins() {
		// "/hello/b/c" descends into ":name", so "b" never becomes a literal child.
		let router = router();
		let (pattern, bound) = router.get_route(&Method::GET, "/hello/b/c").unwrap();

		assert_eq!(pattern, "/hello/b/c");
		assert!(bound.is_empty());

		let (pattern, bound) = router.get_route(&Method::GET, "/hello/x/c").unwrap();
		assert_eq!(pattern, "/hello/b/c");
		assert!(bound.is_empty());
	}

	#[test]
	fn handles_matches() {
		let router = router();
		let response = run(&router, Method::GET, "/hello/geektutu");

		assert_eq!(response.status(), StatusCode::OK);
		assert_eq!(response.body(), b"hello");
	}

	#[test]
	fn handles_misses() {
		let router = router();
		let response = run(&router, Method::GET, "/nomatch");

		assert_eq!(response.status(), StatusCode::NOT_FOUND);
		assert_eq!(response.body(), b"404 NOT FOUND: /nomatch");
	}

	#[test]
	fn duplicate_registration_replaces_handler() {
		let mut router = Router::default();
		router
			.add_route(Method::GET, "/dup", reply("first"))
			.add_route(Method::GET, "/dup", reply("second"));

		assert_eq!(run(&router, Method::GET, "/dup").body(), b"second");
	}

	#[test]
	fn renamed_param_takes_over_branch() {
		let mut router = Router::default();
		router
			.add_route(Method::GET, "/a/:x", reply("x"))
			.add_route(Method::GET, "/a/:y", reply("y"));

		let (pattern, bound) = router.get_route(&Method::GET, "/a/1").unwrap();
		assert_eq!(pattern, "/a/:y");
		assert_eq!(bound, params(&[("y", "1")]));
		assert_eq!(run(&router, Method::GET, "/a/1").body(), b"y");
	}

	#[test]
	fn unnormalized_pattern_keeps_its_own_key() {
		let mut router = Router::default();
		router
			.add_route(Method::GET, "/b", reply("plain"))
			.add_route(Method::GET, "//b", reply("doubled"));

		assert_eq!(router.handlers.len(), 2);
		assert_eq!(run(&router, Method::GET, "/b").body(), b"doubled");
	}
}
