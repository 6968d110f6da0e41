use crate::Context;
use std::sync::Arc;

/// A route handler or middleware. Both share one signature: middleware is just a handler that
/// calls [`Context::next`] somewhere in its body.
pub type HandlerFunc = Arc<dyn Fn(&mut Context) + Send + Sync>;

/// Box a closure or function into a [`HandlerFunc`].
pub fn handler<H>(h: H) -> HandlerFunc
where
	H: Fn(&mut Context) + Send + Sync + 'static,
{
	Arc::new(h)
}

/// Split a pattern or request path into its segments.
///
/// Empty segments are dropped, so `//a//b` and `/a/b` are the same path. A segment starting with
/// `*` ends the split: everything after it belongs to the wildcard.
pub fn parse_pattern(pattern: &str) -> Vec<&str> {
	let mut parts = vec![];
	for segment in pattern.split('/') {
		if segment.is_empty() {
			continue;
		}

		parts.push(segment);
		if segment.starts_with('*') {
			break;
		}
	}
	parts
}

/// Whether a segment matches dynamically (`:name` or `*name`).
pub(crate) fn is_wild(segment: &str) -> bool {
	segment.starts_with(':') || segment.starts_with('*')
}
