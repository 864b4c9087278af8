//! Range requests (RFC 9110 §14).
//!
//! Only single byte ranges are honored. Malformed or multi-range headers are
//! ignored and the whole representation is served, which the RFC permits.

/// A single byte range, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered.
    pub fn content_length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` value for a representation of `total` bytes.
    pub fn content_range(&self, total: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, total)
    }
}

/// How to answer a request given its Range header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No usable Range header: send everything.
    Full,
    /// 206 with this slice.
    Partial(ByteRange),
    /// 416.
    Unsatisfiable,
}

/// `Content-Range` value for a 416 response.
pub fn unsatisfiable_content_range(total: u64) -> String {
    format!("bytes */{}", total)
}

/// Interpret a Range header against a file of `size` bytes.
///
/// Formats: `bytes=0-499`, `bytes=500-` (to end), `bytes=-500` (last 500).
pub fn evaluate(header: Option<&str>, size: u64) -> RangeOutcome {
    let Some(header) = header else {
        return RangeOutcome::Full;
    };
    let Some((unit, set)) = header.split_once('=') else {
        return RangeOutcome::Full;
    };
    if !unit.trim().eq_ignore_ascii_case("bytes") {
        return RangeOutcome::Full;
    }
    let set = set.trim();
    if set.contains(',') {
        return RangeOutcome::Full;
    }
    let Some((start_str, end_str)) = set.split_once('-') else {
        return RangeOutcome::Full;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    if start_str.is_empty() {
        // Suffix range: last N bytes.
        let Ok(suffix) = end_str.parse::<u64>() else {
            return RangeOutcome::Full;
        };
        if suffix == 0 || size == 0 {
            return RangeOutcome::Unsatisfiable;
        }
        return RangeOutcome::Partial(ByteRange {
            start: size.saturating_sub(suffix),
            end: size - 1,
        });
    }

    let Ok(start) = start_str.parse::<u64>() else {
        return RangeOutcome::Full;
    };
    let end = if end_str.is_empty() {
        None
    } else {
        match end_str.parse::<u64>() {
            Ok(end) if end >= start => Some(end),
            _ => return RangeOutcome::Full,
        }
    };

    if start >= size {
        return RangeOutcome::Unsatisfiable;
    }
    let last = size - 1;
    RangeOutcome::Partial(ByteRange {
        start,
        end: end.map_or(last, |e| e.min(last)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(start: u64, end: u64) -> RangeOutcome {
        RangeOutcome::Partial(ByteRange { start, end })
    }

    #[test]
    fn test_first_hundred_bytes() {
        let outcome = evaluate(Some("bytes=0-99"), 1000);
        assert_eq!(outcome, partial(0, 99));
        let RangeOutcome::Partial(range) = outcome else { unreachable!() };
        assert_eq!(range.content_length(), 100);
        assert_eq!(range.content_range(1000), "bytes 0-99/1000");
    }

    #[test]
    fn test_open_and_suffix_ranges() {
        assert_eq!(evaluate(Some("bytes=500-"), 1000), partial(500, 999));
        assert_eq!(evaluate(Some("bytes=-100"), 1000), partial(900, 999));
        assert_eq!(evaluate(Some("bytes=-5000"), 1000), partial(0, 999));
    }

    #[test]
    fn test_end_is_clamped() {
        assert_eq!(evaluate(Some("bytes=900-5000"), 1000), partial(900, 999));
    }

    #[test]
    fn test_unsatisfiable() {
        assert_eq!(evaluate(Some("bytes=1000-"), 1000), RangeOutcome::Unsatisfiable);
        assert_eq!(evaluate(Some("bytes=0-10"), 0), RangeOutcome::Unsatisfiable);
        assert_eq!(evaluate(Some("bytes=-0"), 1000), RangeOutcome::Unsatisfiable);
        assert_eq!(unsatisfiable_content_range(1000), "bytes */1000");
    }

    #[test]
    fn test_ignored_headers() {
        assert_eq!(evaluate(None, 1000), RangeOutcome::Full);
        assert_eq!(evaluate(Some("items=0-1"), 1000), RangeOutcome::Full);
        assert_eq!(evaluate(Some("bytes=0-1,5-9"), 1000), RangeOutcome::Full);
        assert_eq!(evaluate(Some("bytes=9-1"), 1000), RangeOutcome::Full);
        assert_eq!(evaluate(Some("bytes=abc"), 1000), RangeOutcome::Full);
        assert_eq!(evaluate(Some("bytes=x-1"), 1000), RangeOutcome::Full);
    }
}
