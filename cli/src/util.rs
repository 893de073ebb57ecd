use std::io::Write;
use std::time::Duration;

use unicode_width::UnicodeWidthStr;

/// Writes text character by character with a fixed delay in between.
pub struct PacedWriter<W> {
    inner: W,
    delay: Duration,
}

impl<W: Write> PacedWriter<W> {
    pub fn new(inner: W, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

impl<W: Write> Write for PacedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.delay.is_zero() {
            return self.inner.write(buf);
        }

        // Pace only valid text, raw bytes go through at once
        let Ok(text) = std::str::from_utf8(buf) else {
            return self.inner.write(buf);
        };

        let mut encoded = [0; 4];
        for c in text.chars() {
            self.inner.write_all(c.encode_utf8(&mut encoded).as_bytes())?;
            self.inner.flush()?;
            std::thread::sleep(self.delay);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// Pads `text` with spaces up to `width` terminal columns.
pub fn pad(text: &str, width: usize) -> String {
    let len = UnicodeWidthStr::width(text);
    format!("{text}{:1$}", "", width.saturating_sub(len))
}

/// Lays out words in aligned columns, `per_line` words per line.
pub fn columns(words: &[&str], per_line: usize) -> String {
    let width = words
        .iter()
        .map(|w| UnicodeWidthStr::width(*w))
        .max()
        .unwrap_or_default();

    let mut out = String::new();
    for line in words.chunks(per_line.max(1)) {
        let cells = line.iter().map(|w| pad(w, width)).collect::<Vec<_>>();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paced_writer_keeps_text() {
        let mut out = Vec::new();
        {
            let mut writer = PacedWriter::new(&mut out, Duration::from_micros(1));
            writeln!(writer, "héllo").unwrap();
        }
        assert_eq!(String::from_utf8(out).unwrap(), "héllo\n");
    }

    #[test]
    fn columns_are_aligned() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcdef", 4), "abcdef");
        assert_eq!(
            columns(&["if", "else", "for"], 2),
            "if    else\nfor\n"
        );
        assert_eq!(columns(&[], 8), "");
    }
}
