use std::fs::File;
use std::io::Read;

use roxmltree::{Document, Node};

use crate::error::{DigitrackError, Result};
use crate::types::{RecordingStart, SidecarSource};
use crate::utils::{apply_additive_offset, normalize_wall_clock, parse_offset_datetime, utc_from_micros};

/// File extension of the technical-events sidecar.
pub const EVENTS_EXTENSION: &str = "evx";

/// `strId` attribute of the event that marks the start of the exam.
pub const EXAM_START_ID: &str = "Technical_ExamStart";

/// Reads the recording start time from an `.evx` events sidecar.
///
/// The sidecar is a UTF-8 XML document whose root holds one element per
/// technical event, each tagged with a `strId` attribute. The element
/// with `strId="Technical_ExamStart"` carries a nested `event` element
/// whose `time` attribute is the start in microseconds since the UNIX
/// epoch, plus an `info` child whose `time` attribute is the same instant
/// as a wall-clock string with an embedded `+HH:MM` offset.
///
/// Both derivations are returned; see [`RecordingStart`] for the
/// normalization rules and the cross-validation helpers.
///
/// # Errors
///
/// * `DigitrackError::AmbiguousSidecar` - directory source with zero or
///   multiple `.evx` files
/// * `DigitrackError::FileNotFound` - sidecar cannot be opened
/// * `DigitrackError::Xml` - document is not well-formed XML
/// * `DigitrackError::EventNotFound` - no exam-start event, or the event
///   is missing its `event`/`info` children or their `time` attributes
/// * `DigitrackError::OffsetParse` - wall-clock stamp has no `+` offset
///
/// # Examples
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use digitrack::{read_start_time, SidecarSource};
///
/// # digitrack::doctest_utils::write_events_sidecar(
/// #     "doc_events.evx", 1_609_459_200_000_000, "2021-01-01T00:00:00+02:00")?;
/// let start = read_start_time(&SidecarSource::detect("doc_events.evx"))?;
///
/// // The stamped values are two hours behind the absolute start.
/// assert_eq!(start.start(), Utc.with_ymd_and_hms(2021, 1, 1, 2, 0, 0).unwrap());
/// assert_eq!(start.unix_time, start.wall_clock);
/// # std::fs::remove_file("doc_events.evx").ok();
/// # Ok::<(), digitrack::DigitrackError>(())
/// ```
pub fn read_start_time(source: &SidecarSource) -> Result<RecordingStart> {
    let path = source.locate(EVENTS_EXTENSION)?;

    let mut file = File::open(&path)
        .map_err(|e| DigitrackError::FileNotFound(format!("{}: {}", path.display(), e)))?;
    let mut xml = String::new();
    file.read_to_string(&mut xml)?;

    parse_start_event(&xml)
}

/// 在根元素的直接子元素里找开始事件并解析两个时间戳
fn parse_start_event(xml: &str) -> Result<RecordingStart> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();

    let exam_start = root
        .children()
        .filter(Node::is_element)
        .find(|n| n.attribute("strId") == Some(EXAM_START_ID))
        .ok_or_else(|| {
            DigitrackError::EventNotFound(format!(
                "no element with strId=\"{}\" under <{}>",
                EXAM_START_ID,
                root.tag_name().name()
            ))
        })?;

    let event = exam_start
        .children()
        .filter(Node::is_element)
        .find(|n| n.has_tag_name("event"))
        .ok_or_else(|| missing_part("<event> child"))?;

    let micros_raw = event
        .attribute("time")
        .ok_or_else(|| missing_part("time attribute on <event>"))?;
    let micros: i64 = micros_raw.trim().parse().map_err(|_| {
        DigitrackError::MalformedSidecar(format!("bad epoch microseconds '{micros_raw}'"))
    })?;

    let info = event
        .children()
        .filter(Node::is_element)
        .find(|n| n.has_tag_name("info"))
        .ok_or_else(|| missing_part("<info> child"))?;
    let stamp_raw = info
        .attribute("time")
        .ok_or_else(|| missing_part("time attribute on <info>"))?;

    // 两条路径用同一个小时偏移归一化，结果应当一致
    let (naive, offset_hours) = parse_offset_datetime(stamp_raw)?;

    Ok(RecordingStart {
        unix_time: apply_additive_offset(utc_from_micros(micros)?, offset_hours),
        wall_clock: normalize_wall_clock(naive, offset_hours),
    })
}

fn missing_part(part: &str) -> DigitrackError {
    DigitrackError::EventNotFound(format!("{EXAM_START_ID} event is missing {part}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn wrap(body: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<eventExport>{body}</eventExport>"
        )
    }

    #[test]
    fn test_parses_both_derivations() {
        let xml = wrap(
            "<event strId=\"Technical_ExamStart\">\
               <event time=\"1510828392099000\">\
                 <info time=\"2017-11-16T10:33:12.099+01:00\"/>\
               </event>\
             </event>",
        );
        let start = parse_start_event(&xml).unwrap();
        let expected = Utc.with_ymd_and_hms(2017, 11, 16, 11, 33, 12).unwrap()
            + Duration::milliseconds(99);
        assert_eq!(start.wall_clock, expected);
        assert_eq!(start.unix_time, expected);
        assert!(start.is_consistent(Duration::seconds(1)));
    }

    #[test]
    fn test_skips_unrelated_events() {
        let xml = wrap(
            "<event strId=\"Technical_Annotation\"><event time=\"0\"/></event>\
             <event strId=\"Technical_ExamStart\">\
               <event time=\"1609459200000000\">\
                 <info time=\"2021-01-01T00:00:00+02:00\"/>\
               </event>\
             </event>",
        );
        let start = parse_start_event(&xml).unwrap();
        assert_eq!(
            start.start(),
            Utc.with_ymd_and_hms(2021, 1, 1, 2, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_event_not_found() {
        let xml = wrap("<event strId=\"Technical_Annotation\"><event time=\"0\"/></event>");
        let err = parse_start_event(&xml).unwrap_err();
        assert!(matches!(err, DigitrackError::EventNotFound(_)));
    }

    #[test]
    fn test_missing_info_child() {
        let xml = wrap(
            "<event strId=\"Technical_ExamStart\"><event time=\"1609459200000000\"/></event>",
        );
        let err = parse_start_event(&xml).unwrap_err();
        assert!(matches!(err, DigitrackError::EventNotFound(_)));
    }

    #[test]
    fn test_bad_epoch_field() {
        let xml = wrap(
            "<event strId=\"Technical_ExamStart\">\
               <event time=\"not-a-number\">\
                 <info time=\"2021-01-01T00:00:00+02:00\"/>\
               </event>\
             </event>",
        );
        let err = parse_start_event(&xml).unwrap_err();
        assert!(matches!(err, DigitrackError::MalformedSidecar(_)));
    }

    #[test]
    fn test_malformed_xml() {
        let err = parse_start_event("<eventExport><unclosed").unwrap_err();
        assert!(matches!(err, DigitrackError::Xml(_)));
    }
}
