// Internal utilities for documentation tests
// This file contains helper functions to fabricate sidecar files for doctests

use std::fs;
use std::path::Path;

use crate::rate::SAMPLING_RATE_OFFSET;
use crate::Result;

/// Creates a minimal `.1` settings sidecar holding `sampling_rate` at the
/// rate-field offset
pub fn write_settings_sidecar<P: AsRef<Path>>(path: P, sampling_rate: f64) -> Result<()> {
    let offset = SAMPLING_RATE_OFFSET as usize;
    let mut bytes = vec![0u8; offset + 8];
    bytes[offset..].copy_from_slice(&sampling_rate.to_le_bytes());
    fs::write(path, bytes)?;
    Ok(())
}

/// Creates an `.evx` events sidecar with an exam-start event plus one
/// unrelated event, mirroring the structure DigiTrack emits
pub fn write_events_sidecar<P: AsRef<Path>>(
    path: P,
    epoch_micros: i64,
    wall_clock: &str,
) -> Result<()> {
    let xml = format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<eventExport>
  <event strId="Technical_Annotation">
    <event time="0"/>
  </event>
  <event strId="Technical_ExamStart">
    <event time="{epoch_micros}">
      <info time="{wall_clock}"/>
    </event>
  </event>
</eventExport>
"#
    );
    fs::write(path, xml)?;
    Ok(())
}

/// Creates a directory that looks like one DigiTrack export: one `.1`
/// settings sidecar and one `.evx` events sidecar
pub fn write_export_dir<P: AsRef<Path>>(
    dir: P,
    sampling_rate: f64,
    epoch_micros: i64,
    wall_clock: &str,
) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    write_settings_sidecar(dir.join("exam.1"), sampling_rate)?;
    write_events_sidecar(dir.join("exam.evx"), epoch_micros, wall_clock)?;
    Ok(())
}
