//! # CLI Module
//!
//! This module provides the command-line layer of trackmark. It plays the
//! part of the caller of the Spotify client: it fetches the playlists a user
//! cares about up front, then asks the client which of them (in priority
//! order) already contains a given track.
//!
//! ## Commands
//!
//! - [`show_track`] - Prints a single track with its artists
//! - [`show_playlist`] - Fetches every page of a playlist and prints it as a table
//! - [`match_track`] - Resolves the first playlist containing a track
//! - [`print_stats`] - Prints request and cache statistics collected so far
//!
//! ## Error Handling
//!
//! Commands report through the `info!`, `success!`, `warning!` and `error!`
//! macros. A failed fetch is fatal for the command that needed it; "not found
//! in any playlist" is a warning, not an error.
//!
//! ## Usage Patterns
//!
//! ```bash
//! trackmark track 4uLU6hMCjMI75M1A2tKUQC
//! trackmark playlist 76OCVnnBFLGwroNqfEo8IU
//! trackmark match 4uLU6hMCjMI75M1A2tKUQC -p 76OCVnnBFLGwroNqfEo8IU --aliases
//! trackmark --stats playlist 76OCVnnBFLGwroNqfEo8IU
//! ```

mod matching;
mod playlist;
mod stats;
mod track;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub use matching::match_track;
pub use playlist::show_playlist;
pub use stats::print_stats;
pub use track::show_track;

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
