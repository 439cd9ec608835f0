//! Abstract operations.

use std::marker::PhantomData;

/// Operation to insert (create) a value remotely.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Operation to select (read) a value.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Selector of `W` by `B`.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Type of the value to select.
    _what: PhantomData<W>,

    /// Value to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] with the given value.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Returns a reference to the inner value.
    #[must_use]
    pub fn by(&self) -> &B {
        &self.by
    }

    /// Consumes this [`By`] and returns the inner value.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
