use crate::{
	group::GroupEntry, logger, panic_message, recovery, Context, Fault, GroupId, HandlerFunc,
	ResponseSink, Router, RouterGroup,
};
use http::Method;
use std::panic::{self, AssertUnwindSafe};

/// The composition root: owns the route table and the flat list of route groups.
///
/// Routes and middleware are registered through `&mut Engine` before serving; serving only needs
/// `&Engine`, so a built engine can be shared across threads as is.
pub struct Engine {
	pub(crate) router: Router,
	pub(crate) groups: Vec<GroupEntry>,
}

impl Default for Engine {
	fn default() -> Self {
		Self::new()
	}
}

impl Engine {
	/// An engine with an empty root group and no routes.
	pub fn new() -> Self {
		Self {
			router: Router::default(),
			groups: vec![GroupEntry::root()],
		}
	}

	/// An engine whose root group already logs every request and recovers from panics.
	pub fn with_default_middleware() -> Self {
		let mut engine = Self::new();
		engine.use_middleware(logger()).use_middleware(recovery());
		engine
	}

	pub fn router(&self) -> &Router {
		&self.router
	}

	/// The root group; every top-level registration goes through it.
	pub fn root(&mut self) -> RouterGroup<'_> {
		RouterGroup::new(self, GroupId::ROOT)
	}

	pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
		let id = self.push_group(GroupId::ROOT, prefix);
		RouterGroup::new(self, id)
	}

	/// Append a child of `parent` to the group list and return its id.
	pub(crate) fn push_group(&mut self, parent: GroupId, prefix: &str) -> GroupId {
		let entry = GroupEntry {
			prefix: format!("{}{}", self.groups[parent.0].prefix, prefix),
			middlewares: vec![],
			parent: Some(parent),
		};
		self.groups.push(entry);
		GroupId(self.groups.len() - 1)
	}

	pub fn group_by_id(&mut self, id: GroupId) -> Option<RouterGroup<'_>> {
		if id.0 < self.groups.len() {
			Some(RouterGroup::new(self, id))
		} else {
			None
		}
	}

	/// Number of groups, the root group included.
	pub fn group_count(&self) -> usize {
		self.groups.len()
	}

	pub fn use_middleware<H>(&mut self, middleware: H) -> &mut Self
	where
		H: Fn(&mut Context) + Send + Sync + 'static,
	{
		self.root().use_middleware(middleware);
		self
	}

	pub fn add_route<H>(&mut self, method: Method, pattern: &str, route: H) -> &mut Self
	where
		H: Fn(&mut Context) + Send + Sync + 'static,
	{
		self.root().add_route(method, pattern, route);
		self
	}

	pub fn get<H>(&mut self, pattern: &str, route: H) -> &mut Self
	where
		H: Fn(&mut Context) + Send + Sync + 'static,
	{
		self.add_route(Method::GET, pattern, route)
	}

	pub fn post<H>(&mut self, pattern: &str, route: H) -> &mut Self
	where
		H: Fn(&mut Context) + Send + Sync + 'static,
	{
		self.add_route(Method::POST, pattern, route)
	}

	pub fn put<H>(&mut self, pattern: &str, route: H) -> &mut Self
	where
		H: Fn(&mut Context) + Send + Sync + 'static,
	{
		self.add_route(Method::PUT, pattern, route)
	}

	pub fn delete<H>(&mut self, pattern: &str, route: H) -> &mut Self
	where
		H: Fn(&mut Context) + Send + Sync + 'static,
	{
		self.add_route(Method::DELETE, pattern, route)
	}

	/// Middlewares of every group whose prefix starts `path`, in group creation order.
	pub fn middlewares_for(&self, path: &str) -> Vec<HandlerFunc> {
		self.groups
			.iter()
			.filter(|group| path.starts_with(&group.prefix))
			.flat_map(|group| group.middlewares.iter().cloned())
			.collect()
	}

	/// Resolve and run `method` `path`, sending the response to `sink`.
	pub fn serve<S: ResponseSink>(
		&self,
		method: Method,
		path: &str,
		sink: &mut S,
	) -> Result<(), Fault> {
		self.dispatch(Context::new(method, path), sink)
	}

	/// Run a prepared context through its middlewares and route.
	///
	/// A panic that no middleware recovers is returned as [`Fault::Panicked`] and nothing is sent
	/// to the sink.
	pub fn dispatch<S: ResponseSink>(&self, mut c: Context, sink: &mut S) -> Result<(), Fault> {
		c.push_handlers(self.middlewares_for(c.path()));

		let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.router.handle(&mut c)));
		if let Err(payload) = outcome {
			let fault = Fault::Panicked {
				method: c.method().clone(),
				path: c.path().to_owned(),
				message: panic_message(&*payload),
			};
			tracing::error!(error = %fault, "unrecovered fault in handler chain");
			return Err(fault);
		}

		sink.send(c.into_response());
		Ok(())
	}
}
