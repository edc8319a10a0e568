//! Version range parsing for dependency declarations
//!
//! Nuspec `<dependency version="...">` attributes and the `dependencies`
//! maps in project.assets.json use NuGet's interval notation. This module
//! reduces such a range to one representative version.

mod range;

pub use range::parse_range;
