// Library exports for linked-label

pub mod config;
pub mod errors;
pub mod fltk_linked_label;
pub mod geometry;
pub mod label;
pub mod layout;
pub mod link;
pub mod opener;
pub mod registry;
pub mod styled_text;
pub mod touch;

pub use label::{EventDisposition, LinkedLabel};
pub use link::{RangeLink, TextLink, TextRange};
pub use touch::Touch;
