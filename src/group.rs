use crate::{handler, Context, Engine, HandlerFunc};
use http::Method;

/// Index of a group in the engine's flat group list. The root group is always `GroupId::ROOT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub(crate) usize);

impl GroupId {
	pub const ROOT: GroupId = GroupId(0);
}

/// Stored state of a group. `parent` is informational only; dispatch never walks it.
pub(crate) struct GroupEntry {
	pub(crate) prefix: String,
	pub(crate) middlewares: Vec<HandlerFunc>,
	pub(crate) parent: Option<GroupId>,
}

impl GroupEntry {
	pub(crate) fn root() -> Self {
		Self {
			prefix: String::new(),
			middlewares: vec![],
			parent: None,
		}
	}
}

/// A handle for registering routes and middleware under a shared path prefix.
///
/// Handles borrow the engine, so only one is live at a time; keep the [`GroupId`] around and use
/// [`Engine::group_by_id`] to come back to a group later.
pub struct RouterGroup<'a> {
	engine: &'a mut Engine,
	id: GroupId,
}

impl<'a> RouterGroup<'a> {
	pub(crate) fn new(engine: &'a mut Engine, id: GroupId) -> Self {
		Self { engine, id }
	}

	fn entry(&self) -> &GroupEntry {
		&self.engine.groups[self.id.0]
	}

	pub fn id(&self) -> GroupId {
		self.id
	}

	/// The full prefix, including every ancestor's prefix.
	pub fn prefix(&self) -> &str {
		&self.entry().prefix
	}

	pub fn parent(&self) -> Option<GroupId> {
		self.entry().parent
	}

	/// Create a subgroup whose prefix is this group's prefix followed by `prefix`.
	///
	/// The subgroup is appended to the engine's group list; its middleware applies wherever its
	/// prefix matches, at the position it was created in.
	pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
		let id = self.engine.push_group(self.id, prefix);
		RouterGroup::new(&mut *self.engine, id)
	}

	/// Append a middleware. Middlewares run in the order they were added.
	pub fn use_middleware<H>(&mut self, middleware: H) -> &mut Self
	where
		H: Fn(&mut Context) + Send + Sync + 'static,
	{
		self.use_handler(handler(middleware))
	}

	pub fn use_handler(&mut self, middleware: HandlerFunc) -> &mut Self {
		self.engine.groups[self.id.0].middlewares.push(middleware);
		self
	}

	/// Register a route at this group's prefix followed by `comp`.
	pub fn add_route<H>(&mut self, method: Method, comp: &str, route: H) -> &mut Self
	where
		H: Fn(&mut Context) + Send + Sync + 'static,
	{
		let pattern = format!("{}{}", self.prefix(), comp);
		self.engine
			.router
			.add_route(method, &pattern, handler(route));
		self
	}

	pub fn get<H>(&mut self, comp: &str, route: H) -> &mut Self
	where
		H: Fn(&mut Context) + Send + Sync + 'static,
	{
		self.add_route(Method::GET, comp, route)
	}

	pub fn post<H>(&mut self, comp: &str, route: H) -> &mut Self
	where
		H: Fn(&mut Context) + Send + Sync + 'static,
	{
		self.add_route(Method::POST, comp, route)
	}

	pub fn put<H>(&mut self, comp: &str, route: H) -> &mut Self
	where
		H: Fn(&mut Context) + Send + Sync + 'static,
	{
		self.add_route(Method::PUT, comp, route)
	}

	pub fn delete<H>(&mut self, comp: &str, route: H) -> &mut Self
	where
		H: Fn(&mut Context) + Send + Sync + 'static,
	{
		self.add_route(Method::DELETE, comp, route)
	}
}
