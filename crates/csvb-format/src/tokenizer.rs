//! Line tokenizer: splits one physical line into trimmed cells
//!
//! Cell splitting and quoting are delegated to a single `csv` reader that is
//! fed one line at a time. Line level rules (comments, block separators,
//! byte-order mark) are applied here, because the `csv` reader silently
//! skips blank lines, and a blank line is what separates blocks.

use crate::error::CsvbError;
use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use std::io::{self, Read};

const BOM: char = '\u{feff}';

/// Tokenizer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Cell delimiter
    pub delimiter: u8,
    /// Quote character
    pub quote: u8,
    /// Starts a comment running to the end of the line, unless quoted
    pub comment: Option<u8>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            comment: Some(b'#'),
        }
    }
}

impl TokenizerConfig {
    /// Set the cell delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the quote character
    #[must_use]
    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    /// Set or disable the comment marker
    #[must_use]
    pub fn with_comment(mut self, comment: Option<u8>) -> Self {
        self.comment = comment;
        self
    }
}

/// The current line, terminated, as the byte source of the `csv` reader
#[derive(Debug, Default)]
struct LineSource {
    line: Vec<u8>,
    pos: usize,
}

impl LineSource {
    fn load(&mut self, line: &str) {
        self.line.clear();
        self.line.extend_from_slice(line.as_bytes());
        self.line.push(b'\n');
        self.pos = 0;
    }
}

impl Read for LineSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut rest = self.line.get(self.pos..).unwrap_or_default();
        let n = rest.read(buf)?;
        self.pos += n;
        Ok(n)
    }
}

/// Turns lines into rows of trimmed cells
#[derive(Debug)]
pub struct Tokenizer {
    builder: ReaderBuilder,
    reader: Reader<LineSource>,
    config: TokenizerConfig,
    record: StringRecord,
    first_line: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(TokenizerConfig::default())
    }
}

impl Tokenizer {
    /// Create a tokenizer
    #[must_use]
    pub fn new(config: TokenizerConfig) -> Self {
        let mut builder = ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .delimiter(config.delimiter)
            .quote(config.quote)
            // One line at a time; the default 8 KiB buffer is far larger than a line
            .buffer_capacity(1024);
        let reader = builder.from_reader(LineSource::default());

        Self {
            builder,
            reader,
            config,
            record: StringRecord::new(),
            first_line: true,
        }
    }

    /// Tokenize one line, with or without its line terminator
    ///
    /// Returns `None` for comment lines and `Some(vec![""])` (a block
    /// separator) for blank lines. A byte-order mark is stripped from the
    /// first line only.
    pub fn tokenize(&mut self, line: &str) -> Result<Option<Vec<String>>, CsvbError> {
        let line = if std::mem::take(&mut self.first_line) {
            line.strip_prefix(BOM).unwrap_or(line)
        } else {
            line
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Some(vec![String::new()]));
        }

        let scan = scan_line(trimmed, &self.config);
        let content = trimmed.get(..scan.end).unwrap_or(trimmed).trim_end();
        if content.is_empty() {
            return Ok(None);
        }

        self.reader.get_mut().load(content);
        let found = self.reader.read_record(&mut self.record);
        if scan.open_quote || self.reader.is_done() {
            // The reader hit the end of its source inside a quoted cell
            self.reader = self.builder.from_reader(LineSource::default());
        }
        if !found? {
            return Ok(Some(vec![String::new()]));
        }

        Ok(Some(self.record.iter().map(str::to_string).collect()))
    }
}

/// Where a line's data ends, and whether it ends inside a quoted cell
struct LineScan {
    end: usize,
    open_quote: bool,
}

/// Find the first comment marker outside a quoted cell
///
/// A quote opens a quoted cell only as the first byte of a cell, as in the
/// `csv` reader; a doubled quote inside a quoted cell is an escaped quote.
fn scan_line(line: &str, config: &TokenizerConfig) -> LineScan {
    let bytes = line.as_bytes();
    let mut in_quotes = false;
    let mut cell_start = true;
    let mut i = 0;

    while let Some(&b) = bytes.get(i) {
        if in_quotes {
            if b == config.quote {
                if bytes.get(i + 1) == Some(&config.quote) {
                    i += 1;
                } else {
                    in_quotes = false;
                }
            }
        } else if Some(b) == config.comment {
            return LineScan {
                end: i,
                open_quote: false,
            };
        } else {
            in_quotes = b == config.quote && cell_start;
            cell_start = b == config.delimiter;
        }
        i += 1;
    }

    LineScan {
        end: bytes.len(),
        open_quote: in_quotes,
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tokenize(line: &str) -> Option<Vec<String>> {
        Tokenizer::default()
            .tokenize(line)
            .expect("Test operation should succeed")
    }

    #[test]
    fn test_cells_are_trimmed() {
        assert_eq!(
            tokenize(" a , b ,c\n"),
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn test_empty_cells_are_kept() {
        assert_eq!(
            tokenize(",x,"),
            Some(vec![String::new(), "x".to_string(), String::new()])
        );
    }

    #[test]
    fn test_quoted_cells() {
        assert_eq!(
            tokenize(r#""Smith, John","say ""hi""""#),
            Some(vec!["Smith, John".to_string(), r#"say "hi""#.to_string()])
        );
    }

    #[test]
    fn test_blank_lines_are_separators() {
        assert_eq!(tokenize(""), Some(vec![String::new()]));
        assert_eq!(tokenize("   \r\n"), Some(vec![String::new()]));
        assert_eq!(tokenize("\"\""), Some(vec![String::new()]));
    }

    #[test]
    fn test_comment_lines_are_skipped() {
        assert_eq!(tokenize("# a comment"), None);
        assert_eq!(tokenize("   #indented"), None);
    }

    #[test]
    fn test_inline_comments_end_the_line() {
        assert_eq!(tokenize("a,#b"), Some(vec!["a".to_string(), String::new()]));
        assert_eq!(
            tokenize("ann,41 # retired"),
            Some(vec!["ann".to_string(), "41".to_string()])
        );
        assert_eq!(tokenize("x#y,z"), Some(vec!["x".to_string()]));
    }

    #[test]
    fn test_quoted_comment_marker_is_data() {
        assert_eq!(
            tokenize(r##""#1 fan","say ""#""" # note"##),
            Some(vec!["#1 fan".to_string(), r##"say "#""##.to_string()])
        );
        assert_eq!(
            tokenize(r#"5" tall,#x"#),
            Some(vec![r#"5" tall"#.to_string(), String::new()])
        );
    }

    #[test]
    fn test_one_reader_serves_many_lines() {
        let mut tokenizer = Tokenizer::default();
        for n in 0..100 {
            let line = format!("{n},\"v{n}\"");
            assert_eq!(
                tokenizer.tokenize(&line).expect("Operation should succeed"),
                Some(vec![n.to_string(), format!("v{n}")])
            );
        }
    }

    #[test]
    fn test_unterminated_quote_does_not_stall_later_lines() {
        let mut tokenizer = Tokenizer::default();
        assert_eq!(
            tokenizer.tokenize("\"open,x").expect("Operation should succeed"),
            Some(vec!["open,x".to_string()])
        );
        assert_eq!(
            tokenizer.tokenize("a,b").expect("Operation should succeed"),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_comment_marker_can_be_disabled() {
        let mut tokenizer = Tokenizer::new(TokenizerConfig::default().with_comment(None));
        assert_eq!(
            tokenizer.tokenize("#tag").expect("Operation should succeed"),
            Some(vec!["#tag".to_string()])
        );
    }

    #[test]
    fn test_custom_delimiter() {
        let mut tokenizer = Tokenizer::new(TokenizerConfig::default().with_delimiter(b';'));
        assert_eq!(
            tokenizer.tokenize("a;b,c").expect("Operation should succeed"),
            Some(vec!["a".to_string(), "b,c".to_string()])
        );
    }

    #[test]
    fn test_bom_is_stripped_from_first_line_only() {
        let mut tokenizer = Tokenizer::default();
        assert_eq!(
            tokenizer.tokenize("\u{feff}name").expect("Operation should succeed"),
            Some(vec!["name".to_string()])
        );
        assert_eq!(
            tokenizer.tokenize("\u{feff}x").expect("Operation should succeed"),
            Some(vec!["\u{feff}x".to_string()])
        );
    }
}
