use std::sync::Arc;

use iref::{Iri, IriBuf};

/// Maximum number of nested remote contexts.
pub const MAX_REMOTE_CONTEXTS: usize = 512;

/// Context processing stack.
///
/// Contains the list of the loaded contexts to detect loops.
#[derive(Clone, Default)]
pub struct ProcessingStack {
	head: Option<Arc<StackNode>>,
	len: usize,
}

impl ProcessingStack {
	/// Creates a new empty processing stack.
	pub fn new() -> Self {
		Self::default()
	}

	/// Checks if the stack is empty.
	pub fn is_empty(&self) -> bool {
		self.head.is_none()
	}

	pub fn len(&self) -> usize {
		self.len
	}

	/// Checks if the given URL is already in the stack.
	///
	/// This is used for loop detection.
	pub fn cycle(&self, url: &Iri) -> bool {
		match &self.head {
			Some(head) => head.contains(url),
			None => false,
		}
	}

	/// Push a new URL to the stack, unless it is already in the stack or the
	/// stack is full.
	///
	/// Returns `true` if the URL was successfully added or
	/// `false` if a loop has been detected.
	pub fn push(&mut self, url: IriBuf) -> bool {
		if self.len >= MAX_REMOTE_CONTEXTS || self.cycle(&url) {
			false
		} else {
			let previous = self.head.take();
			self.head = Some(Arc::new(StackNode { previous, url }));
			self.len += 1;
			true
		}
	}
}

/// Single frame of the context processing stack.
struct StackNode {
	/// Previous frame.
	previous: Option<Arc<StackNode>>,

	/// URL of the last loaded context.
	url: IriBuf,
}

impl StackNode {
	/// Checks if this frame or any parent holds the given URL.
	fn contains(&self, url: &Iri) -> bool {
		if self.url == *url {
			true
		} else {
			match &self.previous {
				Some(prev) => prev.contains(url),
				None => false,
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use static_iref::iri;

	#[test]
	fn detects_cycles() {
		let mut stack = ProcessingStack::new();
		assert!(stack.push(iri!("http://x/a").to_owned()));

		let mut branch = stack.clone();
		assert!(branch.push(iri!("http://x/b").to_owned()));
		assert!(!branch.push(iri!("http://x/a").to_owned()));

		assert!(stack.push(iri!("http://x/b").to_owned()));
		assert_eq!(stack.len(), 2);
	}
}
