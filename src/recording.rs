use std::path::Path;

use chrono::{DateTime, Duration, Utc};

use crate::error::Result;
use crate::events::read_start_time;
use crate::rate::exact_sampling_rate;
use crate::timeline;
use crate::types::{RecordingStart, SidecarSource};

/// Corrected metadata for one DigiTrack recording.
///
/// This is the bundle a conversion tool needs before it touches the
/// signal data: the sampling rate the amplifier actually achieved (to
/// overwrite the nominal rate in the EDF header) and the absolute start
/// time (to build the time axis). Reading the EDF container itself is the
/// job of whatever EDF reader the caller already uses.
///
/// # Examples
///
/// ```rust
/// use digitrack::RecordingMetadata;
///
/// # digitrack::doctest_utils::write_export_dir(
/// #     "doc_export", 249.93896484375,
/// #     1_609_459_200_000_000, "2021-01-01T00:00:00+02:00")?;
/// let meta = RecordingMetadata::discover("doc_export")?;
///
/// // Overwrite the nominal rate in your EDF reader's header with
/// // meta.sampling_rate, then build the time axis:
/// let stamps = meta.timestamps(1000)?;
/// assert_eq!(stamps.len(), 1000);
/// assert_eq!(stamps[0], meta.start.start());
/// # std::fs::remove_dir_all("doc_export").ok();
/// # Ok::<(), digitrack::DigitrackError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordingMetadata {
    /// Achieved sampling rate in samples per second.
    pub sampling_rate: f64,
    /// Normalized recording start time.
    pub start: RecordingStart,
}

impl RecordingMetadata {
    /// Reads both sidecars from one export directory.
    ///
    /// The directory must contain exactly one `.1` and exactly one `.evx`
    /// file.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        Self::from_sources(
            &SidecarSource::Directory(dir.clone()),
            &SidecarSource::Directory(dir),
        )
    }

    /// Reads the two sidecars from independently specified sources.
    pub fn from_sources(settings: &SidecarSource, events: &SidecarSource) -> Result<Self> {
        Ok(RecordingMetadata {
            sampling_rate: exact_sampling_rate(settings)?,
            start: read_start_time(events)?,
        })
    }

    /// Duration of one sample at the achieved rate.
    pub fn sample_interval(&self) -> Result<Duration> {
        timeline::sample_interval(self.sampling_rate)
    }

    /// Projects the timestamp vector for `n_samples` samples without
    /// re-reading the sidecars.
    pub fn timestamps(&self, n_samples: usize) -> Result<Vec<DateTime<Utc>>> {
        timeline::timestamp_vector(self.start.start(), n_samples, self.sampling_rate)
    }
}
