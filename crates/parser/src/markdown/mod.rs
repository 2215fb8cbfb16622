//! Markdown endpoint-description reader
//!
//! Reads the constrained convention endpoint documents are written in and
//! flattens it into a [`NodeTree`](docs2oas_common::NodeTree):
//!
//! ```markdown
//! # POST /users/{user_id}/addresses
//! ## description: Add an address to a user
//!
//! #### Path
//! | Field   | Type    | Description |
//! |---------|---------|-------------|
//! | user_id | integer | User id     |
//!
//! #### Body
//! | Field          | Type   | Description |
//! |----------------|--------|-------------|
//! | street         | string | Street line |
//! | tags[]?        | string | Labels      |
//!
//! ### Responses
//! #### 201
//! Content
//!
//! | Field | Type    |
//! |-------|---------|
//! | id    | integer |
//! ```
//!
//! Only ATX headings, pipe tables and paragraphs are recognized; fenced
//! code blocks are skipped. This is not a general markdown parser.
//!
//! ## Usage
//! ```rust,ignore
//! use docs2oas_parser::MarkdownParser;
//!
//! let tree = MarkdownParser::from_file("api/create_address.md")?.parse();
//! ```

mod blocks;
mod parser;

pub use parser::MarkdownParser;
