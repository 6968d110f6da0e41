use crate::route::is_wild;

/// One segment of a method's route tree.
///
/// `pattern` is only set on the node where a registered route ends; intermediate nodes keep it
/// empty and are not valid matches even when a lookup stops on them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RouteNode {
	pattern: String,
	part: String,
	children: Vec<RouteNode>,
	is_wild: bool,
}

impl RouteNode {
	fn new(part: &str) -> Self {
		Self {
			pattern: String::new(),
			part: part.to_owned(),
			children: vec![],
			is_wild: is_wild(part),
		}
	}

	/// The full pattern of the route ending here, empty on intermediate nodes.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	pub fn part(&self) -> &str {
		&self.part
	}

	pub fn children(&self) -> &[RouteNode] {
		&self.children
	}

	pub fn is_wild(&self) -> bool {
		self.is_wild
	}

	fn matches(&self, part: &str) -> bool {
		self.part == part || self.is_wild
	}

	/// Insert `parts[depth..]` below this node, marking the last node with `pattern`.
	///
	/// The first child that matches a segment is reused, so once a wild child exists every later
	/// segment at that depth descends into it.
	pub fn insert(&mut self, pattern: &str, parts: &[&str], depth: usize) {
		if depth == parts.len() {
			self.pattern = pattern.to_owned();
			return;
		}

		let part = parts[depth];
		let idx = match self.children.iter().position(|child| child.matches(part)) {
			Some(idx) => idx,
			None => {
				self.children.push(RouteNode::new(part));
				self.children.len() - 1
			}
		};
		self.children[idx].insert(pattern, parts, depth + 1);
	}

	/// Find the node a route ends on for `parts`, trying matching children in insertion order and
	/// backtracking out of branches that end without a pattern.
	pub fn search(&self, parts: &[&str], depth: usize) -> Option<&RouteNode> {
		if depth == parts.len() || self.part.starts_with('*') {
			if self.pattern.is_empty() {
				return None;
			}
			return Some(self);
		}

		let part = parts[depth];
		self.children
			.iter()
			.filter(|child| child.matches(part))
			.find_map(|child| child.search(parts, depth + 1))
	}
}
