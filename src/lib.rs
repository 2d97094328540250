#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

pub mod check;
pub mod error;
pub mod fetch;
pub mod toc;

pub use error::{Error, Result};
pub use toc::{Counts, Heading, HeadingKind, OutlineNode, Toc, TocConfig, extract};
