use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

use crate::error::{DigitrackError, Result};
use crate::types::SidecarSource;

/// File extension of the amplifier settings sidecar.
pub const SETTINGS_EXTENSION: &str = "1";

/// Byte offset of the achieved-sampling-rate field inside the `.1`
/// settings sidecar.
///
/// The settings blob has no magic header or version field. The layout is
/// a 490-byte preamble followed by 32-byte entries; the rate field is the
/// IEEE-754 double sitting after entry 89, i.e. at byte
/// 490 + 89 × 32 = 3338. Because nothing in the file announces its own
/// size, the file length is checked against this offset before seeking.
pub const SAMPLING_RATE_OFFSET: u64 = 490 + 89 * 32;

/// Reads the exact sampling rate from a `.1` settings sidecar.
///
/// The EDF header written by the DigiTrack recording software carries the
/// sampling rate the operator *selected*; the rate the amplifier actually
/// achieved is stored in the `.1` sidecar and can differ by a fraction of
/// a hertz. Timestamp reconstruction and any frequency-domain analysis
/// need the achieved value.
///
/// The read is pure: calling it twice on the same file yields the same
/// bits.
///
/// # Errors
///
/// * `DigitrackError::AmbiguousSidecar` - directory source with zero or
///   multiple `.1` files
/// * `DigitrackError::FileNotFound` - sidecar cannot be opened
/// * `DigitrackError::MalformedSidecar` - file too short to contain the
///   rate field
///
/// # Examples
///
/// ```rust
/// use digitrack::{exact_sampling_rate, SidecarSource};
///
/// # digitrack::doctest_utils::write_settings_sidecar("doc_rate.1", 249.93896484375)?;
/// let rate = exact_sampling_rate(&SidecarSource::detect("doc_rate.1"))?;
/// assert_eq!(rate, 249.93896484375);
/// # std::fs::remove_file("doc_rate.1").ok();
/// # Ok::<(), digitrack::DigitrackError>(())
/// ```
pub fn exact_sampling_rate(source: &SidecarSource) -> Result<f64> {
    let path = source.locate(SETTINGS_EXTENSION)?;

    let mut file = File::open(&path)
        .map_err(|e| DigitrackError::FileNotFound(format!("{}: {}", path.display(), e)))?;

    // 先验证文件长度，再seek
    let len = file.metadata()?.len();
    let needed = SAMPLING_RATE_OFFSET + 8;
    if len < needed {
        return Err(DigitrackError::MalformedSidecar(format!(
            "{} is {} bytes, need at least {} for the sampling-rate field",
            path.display(),
            len,
            needed
        )));
    }

    file.seek(SeekFrom::Start(SAMPLING_RATE_OFFSET))?;
    let mut buf = [0u8; 8];
    file.read_exact(&mut buf)?;

    // DigiTrack runs on x86 Windows, so the field is little-endian on disk.
    Ok(f64::from_le_bytes(buf))
}
