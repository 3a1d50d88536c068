//! This module has things for managing arrays over a region of space,
//! which really means retrieving values based on world coordinates.
//! A buffer often represents a small piece of a larger array,
//! so views pair a buffer with the region it covers
//! and translate world coordinates into buffer indices.

mod view;

pub use view::*;
