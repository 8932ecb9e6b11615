use core::fmt;

use crate::ring::RingBuffer;

const BYTES_PER_ROW: usize = 16;

/// Hex and ASCII rendering of a buffer's live window.
///
/// Rows are addressed by logical offset from the read cursor. The row holding
/// the first pending byte is flagged with `>` so rewritten regions are easy to
/// spot in debug logs.
pub struct Dump<'a> {
    buffer: &'a RingBuffer,
}

impl<'a> Dump<'a> {
    pub(crate) const fn new(buffer: &'a RingBuffer) -> Self {
        Self { buffer }
    }
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buf = self.buffer;
        writeln!(
            f,
            "buffer capacity={} cursor={} sent={} pending={}",
            buf.capacity(),
            buf.read_cursor(),
            buf.sent_len(),
            buf.pending_len()
        )?;

        let (head, tail) = buf.segments(0, buf.len());
        let mut bytes = head.iter().chain(tail).copied();
        let mut row = [0u8; BYTES_PER_ROW];
        let mut offset = 0;

        loop {
            let mut filled = 0;
            for slot in &mut row {
                match bytes.next() {
                    Some(byte) => {
                        *slot = byte;
                        filled += 1;
                    }
                    None => break,
                }
            }
            if filled == 0 {
                break;
            }

            let marker = if (offset..offset + filled).contains(&buf.sent_len()) {
                '>'
            } else {
                ' '
            };
            write!(f, "{marker}{offset:06x} ")?;
            for index in 0..BYTES_PER_ROW {
                if index < filled {
                    write!(f, " {:02x}", row[index])?;
                } else {
                    f.write_str("   ")?;
                }
            }
            f.write_str("  |")?;
            for &byte in &row[..filled] {
                let shown = if byte.is_ascii_graphic() || byte == b' ' {
                    byte as char
                } else {
                    '.'
                };
                write!(f, "{shown}")?;
            }
            writeln!(f, "|")?;
            offset += filled;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::RingBuffer;

    #[test]
    fn dump_marks_pending_row_and_escapes_binary() {
        let mut buf = RingBuffer::new(32);
        buf.fill(b"sent\x00\x01pending");
        buf.forward(4);

        let rendered = buf.dump().to_string();
        let mut lines = rendered.lines();
        assert_eq!(
            lines.next(),
            Some("buffer capacity=32 cursor=0 sent=4 pending=9")
        );
        let row = lines.next().expect("one data row");
        assert!(row.starts_with(">000000  73 65 6e 74 00 01"));
        assert!(row.ends_with("|sent..pending|"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_buffer_dumps_header_only() {
        let buf = RingBuffer::new(8);
        assert_eq!(
            buf.dump().to_string(),
            "buffer capacity=8 cursor=0 sent=0 pending=0\n"
        );
    }
}
