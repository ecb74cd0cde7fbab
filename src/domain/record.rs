//! Capabilities a browsable record exposes to the rest of the crate.
//!
//! The navigator and templates never inspect a record's concrete type. They
//! only rely on the small traits defined here:
//!
//! - [`HasLink`]: the record can be opened in a browser
//! - [`Fields`]: named text fields for template rendering
//!
//! Search matching uses the record's `Display` output.

use std::borrow::Cow;

/// A record that points at a web page.
pub trait HasLink {
    /// Returns the record's web URL, or `None` if it has none.
    fn link(&self) -> Option<&str>;
}

/// Named, textual fields that templates can reference as `{{.Name}}`.
pub trait Fields {
    /// Looks up a field by name. Unknown names return `None`.
    fn field(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl<T: HasLink + ?Sized> HasLink for &T {
    fn link(&self) -> Option<&str> {
        (**self).link()
    }
}

impl<T: Fields + ?Sized> Fields for &T {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        (**self).field(name)
    }
}
