//! Line parser for `snmp6` style counter files.
//!
//! Every line with at least two whitespace-separated fields contributes its
//! second field to the [`CounterSequence`]. Shorter lines are skipped and do not
//! reserve a position, so ordinals count valid lines, not file lines.
//!
//! Values are parsed permissively: an optional sign followed by the longest run
//! of decimal digits. A field without leading digits yields `0` and overflow
//! saturates, so a single malformed value never fails the whole file.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use super::{Error, Result};

/// Maximum number of bytes of a single line taken into account. The rest of
/// an over-long line is discarded.
pub const MAX_LINE_LEN: usize = 1023;

/// Maximum number of whitespace-separated fields split from a single line.
pub const MAX_FIELDS: usize = 16;

/// A single parsed counter line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterLine {
    /// Number of fields on the line, capped at [`MAX_FIELDS`].
    pub fields: usize,
    /// The second field as a signed integer.
    pub value: i64,
}

impl CounterLine {
    /// Parses a line, returning `None` if it has fewer than two fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmp6_monitor::counters::CounterLine;
    ///
    /// let line = CounterLine::parse("Ip6InOctets 4096\n").unwrap();
    /// assert_eq!(line.value, 4096);
    /// assert!(CounterLine::parse("TotalPackets").is_none());
    /// ```
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line
            .split(is_field_separator)
            .filter(|f| !f.is_empty())
            .take(MAX_FIELDS);
        fields.next()?;
        let value = parse_leading_i64(fields.next()?);

        Some(Self {
            fields: 2 + fields.count(),
            value,
        })
    }
}

/// Field separators of a counter line: space, tab, carriage return, newline.
fn is_field_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Parses the leading integer of `field` the way `atoll(3)` does.
fn parse_leading_i64(field: &str) -> i64 {
    let field = field.trim_start();
    let (negative, digits) = match field.as_bytes().first() {
        Some(b'-') => (true, &field[1..]),
        Some(b'+') => (false, &field[1..]),
        _ => (false, field),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(b - b'0');
        let next = value.checked_mul(10).and_then(|v| {
            if negative {
                v.checked_sub(digit)
            } else {
                v.checked_add(digit)
            }
        });
        value = match next {
            Some(v) => v,
            None if negative => return i64::MIN,
            None => return i64::MAX,
        };
    }

    value
}

/// Reads one line into `line`, keeping at most [`MAX_LINE_LEN`] bytes of it.
///
/// The remainder of an over-long line is consumed from `buf` without being
/// stored, so `line` never grows beyond [`MAX_LINE_LEN`] bytes. The newline is
/// consumed but not stored.
///
/// # Returns
///
/// The length of the whole line without its newline, or `None` at end of input.
fn read_bounded_line<R: BufRead>(
    buf: &mut R,
    line: &mut Vec<u8>,
) -> std::io::Result<Option<usize>> {
    let mut total = 0;
    let mut read_any = false;

    loop {
        let (done, used) = {
            let available = match buf.fill_buf() {
                Ok(available) => available,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            if available.is_empty() {
                return Ok(read_any.then_some(total));
            }
            read_any = true;

            let (chunk, done) = match available.iter().position(|&b| b == b'\n') {
                Some(i) => (&available[..i], true),
                None => (available, false),
            };
            let room = MAX_LINE_LEN.saturating_sub(line.len());
            line.extend_from_slice(&chunk[..chunk.len().min(room)]);
            total += chunk.len();

            (done, chunk.len() + usize::from(done))
        };
        buf.consume(used);

        if done {
            return Ok(Some(total));
        }
    }
}

/// Counter values of one file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterSequence(Vec<i64>);

impl CounterSequence {
    /// Reads counter lines from a buffered reader until end of input.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if reading from the input fails.
    pub fn from_reader<R: BufRead>(buf: &mut R) -> std::io::Result<Self> {
        let mut values = Vec::with_capacity(96);
        let mut line = Vec::with_capacity(MAX_LINE_LEN);

        while let Some(len) = read_bounded_line(buf, &mut line)? {
            if len > MAX_LINE_LEN {
                log::debug!(
                    "Truncated counter line of {} bytes to {} bytes",
                    len,
                    MAX_LINE_LEN
                );
            }

            if let Some(parsed) = CounterLine::parse(&String::from_utf8_lossy(&line)) {
                values.push(parsed.value);
            }
            line.clear();
        }

        Ok(Self(values))
    }

    /// Returns the value at the given ordinal position.
    pub fn get(&self, ordinal: usize) -> Option<i64> {
        self.0.get(ordinal).copied()
    }

    /// Number of valid counter lines.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no valid counter line was read.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All values, indexed by ordinal.
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }
}

impl From<Vec<i64>> for CounterSequence {
    fn from(values: Vec<i64>) -> Self {
        Self(values)
    }
}

/// Parses the counter file at `path`.
///
/// The file is opened and closed within this call.
///
/// # Errors
///
/// - [`Error::SourceUnavailable`] if the file cannot be opened.
/// - [`Error::ReadLine`] if reading from the file fails.
///
/// # Example
///
/// ```no_run
/// use snmp6_monitor::counters;
///
/// let seq = counters::parse("/proc/net/snmp6").unwrap();
/// println!("{} counters", seq.len());
/// ```
pub fn parse(path: impl AsRef<Path>) -> Result<CounterSequence> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    CounterSequence::from_reader(&mut BufReader::new(file)).map_err(|source| Error::ReadLine {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_input() {
        let data = b"";
        let seq = CounterSequence::from_reader(&mut &data[..]).unwrap();
        assert!(seq.is_empty());
    }

    #[test]
    fn test_parse_in_file_order() {
        let data = b"\
Ip6InReceives                   	12
Ip6InHdrErrors                  	0
Ip6InDelivers                   	9
";
        let seq = CounterSequence::from_reader(&mut &data[..]).unwrap();
        assert_eq!(seq.as_slice(), &[12, 0, 9]);
    }

    #[test]
    fn test_short_lines_do_not_consume_ordinals() {
        let data = b"\
Ip6InReceives 1
TotalPackets


Ip6InHdrErrors 2
";
        let seq = CounterSequence::from_reader(&mut &data[..]).unwrap();
        assert_eq!(seq.as_slice(), &[1, 2]);
    }

    #[test]
    fn test_unparsable_values() {
        let data = b"\
Ip6InReceives xyz
Ip6InHdrErrors 42abc
Ip6InTooBigErrors -7
Ip6InNoRoutes +5
";
        let seq = CounterSequence::from_reader(&mut &data[..]).unwrap();
        assert_eq!(seq.as_slice(), &[0, 42, -7, 5]);
    }

    #[test]
    fn test_overflow_saturates() {
        assert_eq!(parse_leading_i64("99999999999999999999"), i64::MAX);
        assert_eq!(parse_leading_i64("-99999999999999999999"), i64::MIN);
        assert_eq!(parse_leading_i64("-9223372036854775808"), i64::MIN);
    }

    #[test]
    fn test_counter_line_field_count_is_capped() {
        let line = (0..40).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        let parsed = CounterLine::parse(&line).unwrap();
        assert_eq!(parsed.fields, MAX_FIELDS);
        assert_eq!(parsed.value, 1);
    }

    #[test]
    fn test_overlong_line_is_truncated() {
        let mut data = format!("Ip6InReceives 7 {}\n", "x".repeat(4 * MAX_LINE_LEN));
        data.push_str("Ip6InHdrErrors 8\n");
        let seq = CounterSequence::from_reader(&mut data.as_bytes()).unwrap();
        assert_eq!(seq.as_slice(), &[7, 8]);
    }

    #[test]
    fn test_value_beyond_line_limit_is_ignored() {
        let data = format!("{} 5\nIp6InHdrErrors 8\n", "L".repeat(MAX_LINE_LEN));
        let seq = CounterSequence::from_reader(&mut data.as_bytes()).unwrap();
        assert_eq!(seq.as_slice(), &[8]);
    }

    #[test]
    fn test_parse_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "ifIndex 2").unwrap();
        writeln!(tmp, "Ip6InReceives 100").unwrap();

        let seq = parse(tmp.path()).unwrap();
        assert_eq!(seq.as_slice(), &[2, 100]);
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse("/definitely/does/not/exist").unwrap_err();
        match err {
            Error::SourceUnavailable { path, source } => {
                assert_eq!(path, Path::new("/definitely/does/not/exist"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_line_buffer_stays_bounded() {
        use std::io::Read;

        const TAIL: usize = 8 * 1024 * 1024;
        let input = std::io::repeat(b'x')
            .take(TAIL as u64)
            .chain(&b"\nIp6InOctets 8\n"[..]);
        let mut reader = BufReader::with_capacity(4096, input);

        let mut line = Vec::with_capacity(MAX_LINE_LEN);
        let capacity = line.capacity();

        let len = read_bounded_line(&mut reader, &mut line).unwrap();
        assert_eq!(len, Some(TAIL));
        assert_eq!(line.len(), MAX_LINE_LEN);
        assert_eq!(line.capacity(), capacity);

        line.clear();
        let len = read_bounded_line(&mut reader, &mut line).unwrap();
        assert_eq!(len, Some(14));
        assert_eq!(line, b"Ip6InOctets 8");

        line.clear();
        assert_eq!(read_bounded_line(&mut reader, &mut line).unwrap(), None);
    }

    #[test]
    fn test_streamed_overlong_line() {
        use std::io::Read;

        let input = std::io::repeat(b'x')
            .take(8 * 1024 * 1024)
            .chain(&b"\nIp6InOctets 8\n"[..]);
        let mut reader = BufReader::with_capacity(4096, input);

        let seq = CounterSequence::from_reader(&mut reader).unwrap();
        assert_eq!(seq.as_slice(), &[8]);
    }

    #[test]
    fn test_last_line_without_newline() {
        let data = b"Ip6InReceives 1\nIp6InHdrErrors 2";
        let seq = CounterSequence::from_reader(&mut &data[..]).unwrap();
        assert_eq!(seq.as_slice(), &[1, 2]);
    }

    #[test]
    fn test_only_blank_tab_and_cr_separate_fields() {
        let parsed = CounterLine::parse("Ip6InOctets\x0b5 7\r\n").unwrap();
        assert_eq!(parsed.value, 7);
        assert_eq!(parsed.fields, 2);

        assert!(CounterLine::parse("Ip6InOctets\x0c9").is_none());
        assert_eq!(CounterLine::parse("\tIp6InOctets\t\t9").unwrap().value, 9);
    }
}
