//! Endpoint document reading for docs2oas
//!
//! This crate is the input side of a conversion run: it reads markdown
//! endpoint descriptions and hands them to the generator as normalized
//! [`NodeTree`](docs2oas_common::NodeTree)s.
//!
//! - [`MarkdownParser`] flattens one document into headings, paragraphs and
//!   tables.
//! - [`DirectorySource`] discovers every `*.md` file under a directory and
//!   implements [`DocumentSource`](docs2oas_common::DocumentSource).

mod directory;
pub mod markdown;

pub use directory::DirectorySource;
pub use markdown::MarkdownParser;
