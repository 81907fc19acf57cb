//! Page scrapers for the People's Daily online archive.
//!
//! The archive exposes one issue per day, each issue split into
//! numbered section pages, each section listing its articles. The
//! [`rmrb`] module walks those three levels:
//!
//! 1. **Issue index**: discover section URLs for a date
//! 2. **Section page**: discover article URLs within a section
//! 3. **Article page**: extract title and body text
//!
//! The site migrated templates over the years and the switchover dates
//! are not reliably known, so every parsing entry point tries an
//! ordered list of layout variants (legacy id-based containers first,
//! then the redesigned class-based ones) until one yields links.
//! Failed fetches and unmatched layouts degrade to empty results; they
//! are logged by callers and never abort a run.

pub mod rmrb;
