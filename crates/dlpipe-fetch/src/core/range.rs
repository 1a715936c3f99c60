use std::str::FromStr;

use thiserror::Error;

pub const RANGE: &str = "Range";
pub const CONTENT_RANGE: &str = "Content-Range";

pub const STATUS_OK: u16 = 200;
pub const STATUS_PARTIAL_CONTENT: u16 = 206;
pub const STATUS_BAD_GATEWAY: u16 = 502;

/// Value of the `Range` header requesting everything from `offset` on.
pub fn range_header(offset: u64) -> String { format!("bytes={offset}-") }

/// A parsed `Content-Range: bytes <start>-<end>/<total>` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRange {
    pub start: u64,
    pub end:   u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("missing content-range header on partial response")]
    Missing,

    #[error("error parsing response content-range header: {0:?}")]
    Malformed(String),

    #[error("unexpected response range start (expected {expected}, got {actual})")]
    Start { expected: u64, actual: u64 },

    #[error("unexpected response range end (expected {expected}, got {actual})")]
    End { expected: u64, actual: u64 },

    #[error("unexpected response range total (expected {expected}, got {actual})")]
    Total { expected: u64, actual: u64 },

    #[error("cannot resume at byte {offset}: resource length is unknown")]
    UnknownLength { offset: u64 },

    #[error("resource length changed (expected {expected}, got {actual})")]
    LengthChanged { expected: u64, actual: u64 },
}

impl FromStr for ContentRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || RangeError::Malformed(s.to_string());

        let lower = s.trim().to_ascii_lowercase();
        let rest = lower.strip_prefix("bytes").ok_or_else(malformed)?;
        if !rest.starts_with(char::is_whitespace) {
            return Err(malformed());
        }

        let (range, total) = rest.trim_start().split_once('/').ok_or_else(malformed)?;
        let (start, end) = range.split_once('-').ok_or_else(malformed)?;

        let number = |part: &str| part.trim().parse::<u64>().map_err(|_| malformed());
        let parsed = ContentRange {
            start: number(start)?,
            end:   number(end)?,
            total: number(total)?,
        };

        if parsed.start > parsed.end {
            return Err(malformed());
        }
        Ok(parsed)
    }
}

/// Check that a partial response resumes exactly at `offset` and runs to the
/// end of a resource of `content_length` bytes.
pub fn validate_resume(
    header: Option<&str>,
    offset: u64,
    content_length: u64,
) -> Result<ContentRange, RangeError> {
    let range: ContentRange = header.ok_or(RangeError::Missing)?.parse()?;

    if range.start != offset {
        return Err(RangeError::Start {
            expected: offset,
            actual:   range.start,
        });
    }
    let last = content_length.saturating_sub(1);
    if range.end != last {
        return Err(RangeError::End {
            expected: last,
            actual:   range.end,
        });
    }
    if range.total != content_length {
        return Err(RangeError::Total {
            expected: content_length,
            actual:   range.total,
        });
    }
    Ok(range)
}
