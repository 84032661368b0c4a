//! # media-sorter CLI
//!
//! Command-line interface for the media sorter.
//!
//! ## Usage
//! ```bash
//! media-sorter organize ~/Camera --dest ~/Sorted --sort year-month
//! media-sorter organize ~/Camera ~/Phone --dest ~/Sorted --month-names --language spanish --dry-run
//! ```

mod cli;

use media_sorter::Result;

fn main() -> Result<()> {
    cli::run()
}
