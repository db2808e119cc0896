use std::ops::{Deref, DerefMut};

/// Value with an optional `@index`.
///
/// Node objects and value objects may carry an index in JSON-LD. `Indexed`
/// dereferences to the wrapped value.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Indexed<T> {
	index: Option<String>,
	value: T,
}

impl<T> Indexed<T> {
	#[inline(always)]
	pub fn new(value: T, index: Option<String>) -> Self {
		Indexed { value, index }
	}

	#[inline(always)]
	pub fn unindexed(value: T) -> Self {
		Self::new(value, None)
	}

	#[inline(always)]
	pub fn inner(&self) -> &T {
		&self.value
	}

	#[inline(always)]
	pub fn inner_mut(&mut self) -> &mut T {
		&mut self.value
	}

	#[inline(always)]
	pub fn into_inner(self) -> T {
		self.value
	}

	#[inline(always)]
	pub fn index(&self) -> Option<&str> {
		self.index.as_deref()
	}

	#[inline(always)]
	pub fn set_index(&mut self, index: Option<String>) {
		self.index = index
	}

	#[inline(always)]
	pub fn into_parts(self) -> (T, Option<String>) {
		(self.value, self.index)
	}

	#[inline(always)]
	pub fn map_inner<U>(self, f: impl FnOnce(T) -> U) -> Indexed<U> {
		Indexed::new(f(self.value), self.index)
	}

	#[inline(always)]
	pub fn cast<U: From<T>>(self) -> Indexed<U> {
		Indexed::new(self.value.into(), self.index)
	}
}

impl<T> From<T> for Indexed<T> {
	#[inline(always)]
	fn from(value: T) -> Indexed<T> {
		Indexed::new(value, None)
	}
}

impl<T> Deref for Indexed<T> {
	type Target = T;

	#[inline(always)]
	fn deref(&self) -> &T {
		&self.value
	}
}

impl<T> DerefMut for Indexed<T> {
	#[inline(always)]
	fn deref_mut(&mut self) -> &mut T {
		&mut self.value
	}
}
