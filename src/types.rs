use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};

use crate::error::{DigitrackError, Result};

/// Location of a sidecar file within a DigiTrack export.
///
/// DigiTrack writes one recording per directory: the EDF signal file plus
/// auxiliary sidecars that share its base name (`.1` for amplifier
/// settings, `.evx` for technical events). Callers therefore either know
/// the sidecar path exactly, or only know the export directory.
///
/// # Examples
///
/// ```rust
/// use digitrack::SidecarSource;
/// use std::path::PathBuf;
///
/// let exact = SidecarSource::File(PathBuf::from("export/exam.1"));
/// let scanned = SidecarSource::Directory(PathBuf::from("export"));
/// assert_ne!(exact, scanned);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidecarSource {
    /// Exact path of the sidecar file itself.
    File(PathBuf),
    /// Directory expected to contain exactly one sidecar with the
    /// requested extension.
    Directory(PathBuf),
}

impl SidecarSource {
    /// Classifies `path` by filesystem metadata.
    ///
    /// An existing directory becomes [`SidecarSource::Directory`]; any
    /// other path is taken verbatim as [`SidecarSource::File`]. The check
    /// uses `is_dir()`, not the spelling of the path, so a directory named
    /// `weird.1` is still scanned rather than opened.
    pub fn detect<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        if path.is_dir() {
            SidecarSource::Directory(path)
        } else {
            SidecarSource::File(path)
        }
    }

    /// Resolves this source to a concrete sidecar path.
    ///
    /// `extension` is matched without the leading dot (`"1"`, `"evx"`).
    /// A [`SidecarSource::File`] resolves to itself; a
    /// [`SidecarSource::Directory`] must contain exactly one regular file
    /// with the requested extension.
    ///
    /// # Errors
    ///
    /// * `DigitrackError::FileNotFound` - directory cannot be listed
    /// * `DigitrackError::AmbiguousSidecar` - zero or multiple candidates
    pub fn locate(&self, extension: &str) -> Result<PathBuf> {
        match self {
            SidecarSource::File(path) => Ok(path.clone()),
            SidecarSource::Directory(dir) => {
                let entries = fs::read_dir(dir).map_err(|e| {
                    DigitrackError::FileNotFound(format!("{}: {}", dir.display(), e))
                })?;

                let mut candidates = Vec::new();
                for entry in entries {
                    let path = entry?.path();
                    if path.is_file() && path.extension().map_or(false, |e| e == extension) {
                        candidates.push(path);
                    }
                }

                if candidates.len() == 1 {
                    Ok(candidates.remove(0))
                } else {
                    Err(DigitrackError::AmbiguousSidecar(format!(
                        "expected exactly one '.{}' file in {}, found {}",
                        extension,
                        dir.display(),
                        candidates.len()
                    )))
                }
            }
        }
    }
}

/// Recording start time recovered from the `.evx` event sidecar.
///
/// DigiTrack stores the exam start twice inside the
/// `Technical_ExamStart` event: as a microsecond UNIX timestamp and as a
/// wall-clock string with an embedded UTC offset. Both derivations are
/// kept so that callers can cross-check them; on well-formed exports they
/// agree to within one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingStart {
    /// Start derived from the microsecond UNIX-epoch attribute.
    pub unix_time: DateTime<Utc>,
    /// Start derived from the wall-clock datetime attribute.
    pub wall_clock: DateTime<Utc>,
}

impl RecordingStart {
    /// The canonical start timestamp.
    ///
    /// This is the wall-clock derivation, the value the first sample of
    /// the recording is stamped with.
    pub fn start(&self) -> DateTime<Utc> {
        self.wall_clock
    }

    /// 两个来源之间的偏差（wall_clock − unix_time）
    pub fn skew(&self) -> Duration {
        self.wall_clock - self.unix_time
    }

    /// Returns true when both derivations agree to within `tolerance`.
    pub fn is_consistent(&self, tolerance: Duration) -> bool {
        self.skew().abs() <= tolerance
    }
}
