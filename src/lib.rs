//! # DigiTrack sidecar reader for Rust
//!
//! A pure Rust library for reading the proprietary sidecar files that the
//! DigiTrack recording software (Elmiko EEG amplifiers) writes next to
//! its EDF exports, and for reconstructing a precise per-sample time
//! axis from them.
//!
//! A DigiTrack export directory holds one recording:
//!
//! ```text
//! export/
//!   exam.edf   the signal data (read with any EDF reader — out of scope here)
//!   exam.1     amplifier settings, including the achieved sampling rate
//!   exam.evx   technical events, including the exam start time
//! ```
//!
//! The EDF header only stores the sampling rate the operator *selected*;
//! the rate the amplifier actually achieved lives in the `.1` sidecar and
//! can differ by a fraction of a hertz — enough to drift the time axis by
//! seconds over a long recording. The absolute start time is not in the
//! EDF header at all; it lives in the `.evx` events sidecar.
//!
//! ## Quick Start
//!
//! ```rust
//! use digitrack::{RecordingMetadata, Result};
//!
//! fn main() -> Result<()> {
//!     # digitrack::doctest_utils::write_export_dir(
//!     #     "quickstart_export", 249.93896484375,
//!     #     1_609_459_200_000_000, "2021-01-01T00:00:00+02:00")?;
//!     // Read both sidecars from the export directory
//!     let meta = RecordingMetadata::discover("quickstart_export")?;
//!
//!     println!("Achieved rate: {} Hz", meta.sampling_rate);
//!     println!("Recording started: {}", meta.start.start());
//!
//!     // Build the absolute timestamp of every sample
//!     let stamps = meta.timestamps(1000)?;
//!     assert_eq!(stamps.len(), 1000);
//!     assert_eq!(stamps[0], meta.start.start());
//!
//!     # std::fs::remove_dir_all("quickstart_export").ok();
//!     Ok(())
//! }
//! ```
//!
//! ## Using the readers individually
//!
//! Each sidecar can also be read on its own. Sources are explicit: pass
//! the sidecar path itself, or the directory that holds exactly one
//! sidecar of the right kind.
//!
//! ```rust
//! use digitrack::{exact_sampling_rate, read_start_time, SidecarSource};
//!
//! # digitrack::doctest_utils::write_export_dir(
//! #     "parts_export", 250.0, 1_609_459_200_000_000, "2021-01-01T00:00:00+02:00")?;
//! let rate = exact_sampling_rate(&SidecarSource::detect("parts_export"))?;
//! let start = read_start_time(&SidecarSource::detect("parts_export/exam.evx"))?;
//!
//! assert_eq!(rate, 250.0);
//! assert_eq!(start.unix_time, start.wall_clock);
//! # std::fs::remove_dir_all("parts_export").ok();
//! # Ok::<(), digitrack::DigitrackError>(())
//! ```
//!
//! ## Inside a conversion tool
//!
//! A typical converter loads the EDF with whatever reader it already
//! uses, overwrites the nominal sampling rate in that reader's metadata
//! with [`RecordingMetadata::sampling_rate`], and dumps the corrected
//! arrays. Any failure while reading a sidecar aborts the conversion of
//! that recording before anything is written: every operation here either
//! fully succeeds or returns an error, never a partial result.
//!
//! ## Time normalization
//!
//! DigiTrack stamps the exam start twice: as microseconds since the UNIX
//! epoch and as a wall-clock string with an embedded `+HH:MM` offset.
//! Both are normalized by UTC-localizing the stamped value and then
//! *adding* the whole-hour offset — the convention the recorder itself
//! uses, kept bit-for-bit even though it is not the usual
//! subtract-from-local rule. [`RecordingStart`] exposes both derivations
//! so callers can cross-check them.

pub mod error;
pub mod types;
pub mod utils;
pub mod rate;
pub mod events;
pub mod timeline;
pub mod recording;

#[doc(hidden)]
pub mod doctest_utils; // For internal doctest support

// Re-export main types for convenience
pub use error::{DigitrackError, Result};
pub use types::{RecordingStart, SidecarSource};
pub use rate::exact_sampling_rate;
pub use events::read_start_time;
pub use timeline::{sample_interval, synthesize_timestamps, timestamp_vector};
pub use recording::RecordingMetadata;

/// Library version
///
/// Returns the current version of the digitrack library.
///
/// # Examples
///
/// ```rust
/// use digitrack;
///
/// let version = digitrack::version();
/// assert!(!version.is_empty());
/// assert!(version.contains('.'));
/// println!("digitrack library version: {}", version);
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
