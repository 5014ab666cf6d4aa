//! # checkworld-cli: World Scanner
//!
//! Provides the `checkworld` command-line interface. The binary is a thin
//! driver over [`checkworld_schema::check_chunk`]: it discovers chunk files,
//! gunzips each one, records the outcome, and moves on. One bad chunk never
//! stops the scan.
//!
//! ## Subcommands
//!
//! - `checkworld validate`: Scan every chunk file under a world directory.
//!
//! ```bash
//! checkworld validate --world saves/world --write-bad-chunks bad.txt
//! checkworld -vv validate --format json
//! ```

pub mod report;
pub mod validate;

/// Exit code when at least one chunk failed its check.
pub const EXIT_CORRUPT: u8 = 2;
