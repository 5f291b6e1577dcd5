use crate::core::table::push_entity;
use crate::core::types::{ConversionCount, PassStats};
use crate::error::StreamError;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// A stateless accented-letter to HTML entity converter.
///
/// Every character maps to either itself or `&name;`; nothing depends on the
/// surrounding text, so the only state of a pass is its counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct AccentConverter;

impl AccentConverter {
    pub fn new() -> Self {
        Self
    }

    /// Streams `source` into `sink`, rewriting tabled characters.
    ///
    /// Input is consumed one buffer at a time, whatever the source hands out
    /// from `fill_buf`, and each buffer is written before the next is read. A
    /// UTF-8 sequence split across two buffers is carried over (at most three
    /// bytes). Any read or write failure aborts the pass; whatever was already
    /// written stays written.
    pub fn convert<R: BufRead, W: Write>(
        &self,
        mut source: R,
        mut sink: W,
    ) -> Result<PassStats, StreamError> {
        let mut stats = PassStats::default();
        let mut pending: Vec<u8> = Vec::new();
        let mut converted_chunk = String::new();

        loop {
            let chunk = match source.fill_buf() {
                Ok(chunk) => chunk,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(StreamError::Read(e)),
            };
            if chunk.is_empty() {
                break;
            }
            pending.extend_from_slice(chunk);
            let consumed = chunk.len();
            source.consume(consumed);

            let text = complete_prefix(&pending).map_err(StreamError::Read)?;
            let decoded = text.len();

            converted_chunk.clear();
            let (converted, chars) = self.push_converted(text, &mut converted_chunk);
            stats.converted += converted;
            stats.characters_read += chars;

            sink.write_all(converted_chunk.as_bytes())
                .map_err(StreamError::Write)?;
            stats.bytes_written += converted_chunk.len() as u64;

            pending.drain(..decoded);
        }

        if !pending.is_empty() {
            return Err(StreamError::Read(invalid_utf8(
                "stream ended inside a UTF-8 sequence",
            )));
        }

        sink.flush().map_err(StreamError::Write)?;
        debug!(
            converted = stats.converted,
            characters = stats.characters_read,
            bytes = stats.bytes_written,
            "conversion pass finished"
        );
        Ok(stats)
    }

    /// Converts an in-memory string, returning the new text and the count.
    pub fn convert_str(&self, text: &str) -> (String, ConversionCount) {
        let mut out = String::with_capacity(text.len());
        let (converted, _) = self.push_converted(text, &mut out);
        (out, converted)
    }

    /// Appends the converted form of `text` to `out`.
    /// Returns (substituted characters, characters seen).
    fn push_converted(&self, text: &str, out: &mut String) -> (ConversionCount, u64) {
        let mut converted = 0;
        let mut seen = 0;
        for c in text.chars() {
            seen += 1;
            if push_entity(c, out) {
                converted += 1;
            } else {
                out.push(c);
            }
        }
        (converted, seen)
    }
}

/// The longest prefix of `bytes` made of whole characters. An incomplete
/// sequence at the very end is not an error yet; it waits for more input.
fn complete_prefix(bytes: &[u8]) -> io::Result<&str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) if e.error_len().is_none() => {
            std::str::from_utf8(&bytes[..e.valid_up_to()]).map_err(|e| invalid_utf8(e.to_string()))
        }
        Err(e) => Err(invalid_utf8(e.to_string())),
    }
}

fn invalid_utf8(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table::ENTRIES;
    use std::cell::Cell;
    use std::io::{BufReader, Cursor, Read};
    use std::rc::Rc;

    fn run(input: &str) -> (String, ConversionCount) {
        let mut out = Vec::new();
        let stats = AccentConverter::new()
            .convert(Cursor::new(input.as_bytes()), &mut out)
            .unwrap();
        (String::from_utf8(out).unwrap(), stats.converted)
    }

    #[test]
    fn documented_examples() {
        assert_eq!(run("café"), ("caf&eacute;".to_string(), 1));
        assert_eq!(run("À Ça Va"), ("&Agrave; &Ccedil;a Va".to_string(), 2));
        assert_eq!(run(""), (String::new(), 0));
        assert_eq!(run("naïve"), ("na&iuml;ve".to_string(), 1));
        assert_eq!(run("1, 2; 3.14 -- (42)!?"), ("1, 2; 3.14 -- (42)!?".to_string(), 0));
    }

    #[test]
    fn untabled_text_passes_through() {
        let text = "plain ASCII <b>&amp;</b> \"quotes\"\nüñ œ 日本語 \u{1F600}\r\n\tend";
        let (out, count) = run(text);
        assert_eq!(out, text);
        assert_eq!(count, 0);

        // Running again changes nothing either.
        assert_eq!(run(&out), (text.to_string(), 0));
    }

    #[test]
    fn every_tabled_character_is_substituted() {
        let input: String = ENTRIES.iter().map(|&(c, _)| c).collect();
        let expected: String = ENTRIES.iter().map(|&(_, n)| format!("&{n};")).collect();
        let (out, count) = run(&input);
        assert_eq!(count, input.chars().count() as u64);
        assert_eq!(out, expected);
    }

    #[test]
    fn order_is_preserved_across_lines() {
        let (out, count) = run("Élève\nà l'école\nfenêtre");
        assert_eq!(out, "&Eacute;l&egrave;ve\n&agrave; l'&eacute;cole\nfen&ecirc;tre");
        assert_eq!(count, 5);
    }

    #[test]
    fn entity_output_is_not_rescanned() {
        let (once, _) = run("é");
        let (twice, count) = run(&once);
        assert_eq!(twice, "&eacute;");
        assert_eq!(count, 0);
    }

    #[test]
    fn stats_count_characters_and_bytes() {
        let mut out = Vec::new();
        let stats = AccentConverter::new()
            .convert(Cursor::new("où\n".as_bytes()), &mut out)
            .unwrap();
        assert_eq!(stats.converted, 1);
        assert_eq!(stats.characters_read, 3);
        assert_eq!(stats.bytes_written, "o&ugrave;\n".len() as u64);
        assert_eq!(stats.bytes_written, out.len() as u64);
    }

    #[test]
    fn convert_str_matches_streaming() {
        let converter = AccentConverter::new();
        assert_eq!(converter.convert_str("Noël à Paris"), ("No&euml;l &agrave; Paris".to_string(), 2));
    }

    #[test]
    fn invalid_utf8_is_a_read_failure() {
        let bytes: &[u8] = &[b'a', 0xff, b'b'];
        let err = AccentConverter::new()
            .convert(Cursor::new(bytes), io::sink())
            .unwrap_err();
        match err {
            StreamError::Read(e) => assert_eq!(e.kind(), io::ErrorKind::InvalidData),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn sequences_split_across_buffers_are_rejoined() {
        // A two-byte buffer cuts every other "é" in half.
        let input = "aéèçà Ùb";
        let mut out = Vec::new();
        let stats = AccentConverter::new()
            .convert(BufReader::with_capacity(2, input.as_bytes()), &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a&eacute;&egrave;&ccedil;&agrave; &Ugrave;b");
        assert_eq!(stats.converted, 5);
        assert_eq!(stats.characters_read, input.chars().count() as u64);
    }

    #[test]
    fn truncated_sequence_at_end_is_a_read_failure() {
        let bytes: &[u8] = &[b'c', b'a', b'f', 0xc3];
        let err = AccentConverter::new()
            .convert(Cursor::new(bytes), io::sink())
            .unwrap_err();
        match err {
            StreamError::Read(e) => assert_eq!(e.kind(), io::ErrorKind::InvalidData),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// Hands out its bytes in small reads and counts how many it has given away.
    struct MeteredSource {
        data: Vec<u8>,
        pos: usize,
        supplied: Rc<Cell<usize>>,
    }

    impl Read for MeteredSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(4096).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            self.supplied.set(self.pos);
            Ok(n)
        }
    }

    /// Remembers how much input had been supplied when output first arrived.
    struct FirstWriteSink {
        supplied: Rc<Cell<usize>>,
        first_write_at: Option<usize>,
        written: usize,
    }

    impl Write for FirstWriteSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.first_write_at.is_none() && !buf.is_empty() {
                self.first_write_at = Some(self.supplied.get());
            }
            self.written += buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn output_starts_before_input_ends() {
        // No newline anywhere: one long minified line.
        let data = "é".repeat(1 << 20).into_bytes();
        let total = data.len();
        let supplied = Rc::new(Cell::new(0));
        let source = MeteredSource { data, pos: 0, supplied: Rc::clone(&supplied) };
        let mut sink = FirstWriteSink { supplied: Rc::clone(&supplied), first_write_at: None, written: 0 };

        let stats = AccentConverter::new()
            .convert(BufReader::with_capacity(8 * 1024, source), &mut sink)
            .unwrap();

        assert_eq!(stats.converted, 1 << 20);
        assert_eq!(sink.written, "&eacute;".len() << 20);
        let first = sink.first_write_at.unwrap();
        assert!(first <= 8 * 1024, "first output only after {first} of {total} input bytes");
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_aborts_the_pass() {
        let err = AccentConverter::new()
            .convert(Cursor::new("déjà".as_bytes()), BrokenSink)
            .unwrap_err();
        assert!(matches!(err, StreamError::Write(_)));
    }
}
