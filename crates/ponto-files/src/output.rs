//! # Assembly Output
//!
//! The result of one successful assembly run: the exact byte payload, the
//! total record count (equal to the trailer's embedded NSR), and the
//! aggregate statistics persisted with the file metadata.

use serde::{Deserialize, Serialize};

/// A fully assembled compliance file payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledFile {
    /// CRLF-joined record lines with trailing CRLF.
    pub bytes: Vec<u8>,
    /// Total number of records, including header and trailer.
    pub total_records: u32,
    /// Aggregate statistics for the metadata row.
    pub statistics: FileStatistics,
}

/// Aggregate statistics of one generated file.
///
/// AFD files carry no schedule context, so their overtime figure is the
/// sum of the annotations provided by the external CLT engine; AEJ files
/// recompute overtime and shortfall against the schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStatistics {
    /// Number of employees covered (always 1 for AEJ).
    pub employee_count: u32,
    /// Number of time entries covered.
    pub entry_count: u32,
    /// Number of punch records emitted.
    pub punch_count: u32,
    /// Number of entries carrying an adjustment.
    pub adjustment_count: u32,
    /// Sum of worked minutes.
    pub worked_minutes: u32,
    /// Sum of overtime minutes.
    pub overtime_minutes: u32,
    /// Sum of shortfall minutes (AEJ only; zero for AFD).
    pub shortfall_minutes: u32,
}

/// Join record lines into the final payload: CRLF between records and a
/// trailing CRLF after the last one.
pub(crate) fn join_crlf(lines: &[String]) -> Vec<u8> {
    let mut out = Vec::with_capacity(lines.iter().map(|l| l.len() + 2).sum());
    for line in lines {
        out.extend_from_slice(line.as_bytes());
        out.extend_from_slice(b"\r\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_crlf_terminates_every_line() {
        let lines = vec!["a".to_string(), "b".to_string()];
        assert_eq!(join_crlf(&lines), b"a\r\nb\r\n");
    }

    #[test]
    fn join_crlf_empty_is_empty() {
        assert_eq!(join_crlf(&[]), b"");
    }
}
