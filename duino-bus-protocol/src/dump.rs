//! Hex dump of packet bytes
//!
//! Renders memory as classic hex-dump lines:
//! ```text
//! Rcvd: 0000: 30 31 32 33 34 35 36 37 38 39 41 42 43 44 45 46 0123456789ABCDEF
//! Rcvd: 0010: 47                                              G
//! ```
//! Each line is built in a fixed buffer and handed to a callback, so the
//! same code feeds `defmt` on a device and `tracing` on a host.

use core::fmt::Write;
use heapless::String;

/// Bytes per line when no valid width is given
pub const DEFAULT_LINE_WIDTH: usize = 16;

/// Widest line that fits the line buffer
pub const MAX_LINE_WIDTH: usize = 32;

/// Longest prefix kept, in bytes; longer prefixes are cut at a char boundary
pub const MAX_PREFIX_LEN: usize = 64;

/// Capacity of a rendered line
///
/// Holds the widest line with a [`MAX_PREFIX_LEN`] prefix and a full
/// `usize` address.
const LINE_CAPACITY: usize = 256;

/// How a dump is laid out
#[derive(Debug, Clone, Copy)]
pub struct DumpOptions<'p> {
    /// Text placed before every line, followed by `": "`
    ///
    /// Only the first [`MAX_PREFIX_LEN`] bytes are used.
    pub prefix: &'p str,
    /// Address shown for the first byte
    pub addr: usize,
    /// Show the address column
    pub show_addr: bool,
    /// Show the ASCII column
    pub show_ascii: bool,
    /// Bytes per line; zero or negative means [`DEFAULT_LINE_WIDTH`]
    pub line_width: isize,
}

impl Default for DumpOptions<'_> {
    fn default() -> Self {
        Self {
            prefix: "",
            addr: 0,
            show_addr: true,
            show_ascii: true,
            line_width: DEFAULT_LINE_WIDTH as isize,
        }
    }
}

impl<'p> DumpOptions<'p> {
    /// Default layout with a prefix
    pub fn with_prefix(prefix: &'p str) -> Self {
        Self {
            prefix,
            ..Self::default()
        }
    }

    fn prefix(&self) -> &'p str {
        let mut end = self.prefix.len().min(MAX_PREFIX_LEN);
        while !self.prefix.is_char_boundary(end) {
            end -= 1;
        }
        &self.prefix[..end]
    }

    fn width(&self) -> usize {
        if self.line_width <= 0 {
            DEFAULT_LINE_WIDTH
        } else {
            (self.line_width as usize).min(MAX_LINE_WIDTH)
        }
    }
}

/// Dump `data`, calling `emit` once per rendered line
pub fn dump_mem(data: &[u8], options: &DumpOptions<'_>, mut emit: impl FnMut(&str)) {
    let mut line: String<LINE_CAPACITY> = String::new();
    let prefix = options.prefix();

    if data.is_empty() {
        if !prefix.is_empty() {
            let _ = write!(line, "{}:", prefix);
        }
        let _ = line.push_str("No data");
        emit(&line);
        return;
    }

    let width = options.width();
    for (idx, chunk) in data.chunks(width).enumerate() {
        line.clear();
        if !prefix.is_empty() {
            let _ = write!(line, "{}: ", prefix);
        }
        if options.show_addr {
            let _ = write!(line, "{:04x}: ", options.addr + idx * width);
        }
        for (i, byte) in chunk.iter().enumerate() {
            if i > 0 {
                let _ = line.push(' ');
            }
            let _ = write!(line, "{:02x}", byte);
        }
        if options.show_ascii {
            // Pad short lines so the ASCII column lines up
            for _ in chunk.len()..width {
                let _ = line.push_str("   ");
            }
            let _ = line.push(' ');
            for &byte in chunk {
                let ch = if (0x20..0x7F).contains(&byte) {
                    byte as char
                } else {
                    '.'
                };
                let _ = line.push(ch);
            }
        }
        emit(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;

    const PREFIX: &str = "    Prefix";

    fn dump(data: &[u8], options: DumpOptions<'_>) -> Vec<String<LINE_CAPACITY>, 4> {
        let mut lines = Vec::new();
        dump_mem(data, &options, |line| {
            lines.push(String::try_from(line).unwrap()).unwrap();
        });
        lines
    }

    #[test]
    fn test_empty_buffer() {
        let lines = dump(b"", DumpOptions::with_prefix(PREFIX));
        assert_eq!(lines[0], "    Prefix:No data");
        assert_eq!(dump(b"", DumpOptions::default())[0], "No data");
    }

    #[test]
    fn test_less_than_one_line() {
        let lines = dump(b"0123", DumpOptions::with_prefix(PREFIX));
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0],
            "    Prefix: 0000: 30 31 32 33                                     0123"
        );
    }

    #[test]
    fn test_less_than_one_line_no_ascii() {
        let options = DumpOptions {
            show_ascii: false,
            ..DumpOptions::with_prefix(PREFIX)
        };
        assert_eq!(dump(b"0123", options)[0], "    Prefix: 0000: 30 31 32 33");
    }

    #[test]
    fn test_a_bit_more_than_a_line() {
        let lines = dump(b"0123456789ABCDEFG", DumpOptions::with_prefix(PREFIX));
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "    Prefix: 0000: 30 31 32 33 34 35 36 37 38 39 41 42 43 44 45 46 0123456789ABCDEF"
        );
        assert_eq!(
            lines[1],
            "    Prefix: 0010: 47                                              G"
        );
    }

    #[test]
    fn test_no_prefix_no_addr_no_ascii() {
        let options = DumpOptions {
            show_addr: false,
            show_ascii: false,
            ..DumpOptions::default()
        };
        let lines = dump(b"0123456789ABCDEFG", options);
        assert_eq!(lines[0], "30 31 32 33 34 35 36 37 38 39 41 42 43 44 45 46");
        assert_eq!(lines[1], "47");
    }

    #[test]
    fn test_addr_line_width() {
        let options = DumpOptions {
            addr: 0x1234,
            line_width: 8,
            ..DumpOptions::default()
        };
        let lines = dump(b"0123456789ABCDEFG", options);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "1234: 30 31 32 33 34 35 36 37 01234567");
        assert_eq!(lines[1], "123c: 38 39 41 42 43 44 45 46 89ABCDEF");
        assert_eq!(lines[2], "1244: 47                      G");
    }

    #[test]
    fn test_non_printable() {
        let lines = dump(b"012\x00\x01\x1e\x1f456", DumpOptions::default());
        assert_eq!(
            lines[0],
            "0000: 30 31 32 00 01 1e 1f 34 35 36                   012....456"
        );
    }

    #[test]
    fn test_long_prefix_is_cut_not_the_line() {
        let long = [b'x'; 200];
        let options = DumpOptions {
            prefix: core::str::from_utf8(&long).unwrap(),
            addr: usize::MAX - 31,
            line_width: MAX_LINE_WIDTH as isize,
            ..DumpOptions::default()
        };
        let lines = dump(&[b'A'; 32], options);
        assert_eq!(lines.len(), 1);

        let (prefix, rest) = lines[0].split_at(MAX_PREFIX_LEN);
        assert!(prefix.bytes().all(|b| b == b'x'));
        assert!(rest.starts_with(": ffff"));
        assert!(rest.ends_with(" AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"));
    }

    #[test]
    fn test_prefix_cut_on_char_boundary() {
        // 3-byte chars: 64 is not a boundary, 63 is
        let mut prefix: String<96> = String::new();
        for _ in 0..30 {
            prefix.push('€').unwrap();
        }
        let lines = dump(b"0", DumpOptions::with_prefix(&prefix));
        assert!(lines[0].starts_with(&prefix[..63]));
        assert!(lines[0][63..].starts_with(": 0000: 30"));
    }

    #[test]
    fn test_neg_line_width() {
        let options = DumpOptions {
            line_width: -6,
            ..DumpOptions::with_prefix(PREFIX)
        };
        let lines = dump(b"0123456789ABCDEFG", options);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "    Prefix: 0010: 47                                              G"
        );
    }
}
