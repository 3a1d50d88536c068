pub mod domain;
pub mod paste;
pub mod util;
