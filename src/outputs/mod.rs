//! Persistence of the downloaded corpus.
//!
//! One JSON file per processed month lands in the destination
//! directory:
//!
//! ```text
//! output_dir/
//! ├── 2023-05.json
//! ├── 2023-06.json
//! └── 2023-07.json
//! ```
//!
//! Each file is a UTF-8 JSON array of `{url, title, content}` objects
//! in crawl order. Files are overwritten whole on rewrite; there is no
//! merging or versioning. The [`json`] module also provides the
//! directory-wide loader used by downstream corpus builders and the
//! boilerplate cleanup pass.

pub mod json;
