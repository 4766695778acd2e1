//! Styled output buffer shared by the news viewer and the scraper.
//!
//! Both screens render into a [`StyledText`]: a plain string plus an ordered
//! list of styled segments. Offsets exposed by this module are **character**
//! offsets, never byte offsets, so that a click position can be mapped back
//! into the buffer regardless of multi-byte text.
//!
//! The news viewer additionally records a [`TitleSpan`] per clickable
//! headline. Clicks and hovers are resolved with the pure functions
//! [`resolve_click`] and [`resolve_hover`].
//!
//! [`OutputRegion`] wraps the rendered content and is read-only outside of an
//! update sequence: the only way to mutate it is through an [`OutputWriter`],
//! and dropping the writer closes the region again.

use std::ops::Range;

/// Visual style of a run of output text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextStyle {
    /// Headline line (clickable when it has a URL).
    Title,
    /// Article description and news status messages.
    Description,
    /// Dashed line between articles.
    Separator,
    Info,
    Success,
    Warning,
    Error,
    /// `[TAG]: ` prefix in scrape results.
    Label,
    /// Extracted element text.
    Body,
}

/// A styled run of text inside a [`StyledText`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Character range covered by the segment.
    pub range: Range<usize>,
    /// Byte range of the same text, used for slicing.
    bytes: Range<usize>,
    pub style: TextStyle,
}

/// Append-only text buffer with style segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText {
    text: String,
    char_len: usize,
    segments: Vec<Segment>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` rendered with `style`. Empty strings are ignored.
    pub fn push(&mut self, text: &str, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        let start = self.char_len;
        let byte_start = self.text.len();
        self.text.push_str(text);
        self.char_len += text.chars().count();
        self.segments.push(Segment {
            range: start..self.char_len,
            bytes: byte_start..self.text.len(),
            style,
        });
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length of the buffer in characters.
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Style of the character at `offset`, if any.
    pub fn style_at(&self, offset: usize) -> Option<TextStyle> {
        let idx = self
            .segments
            .partition_point(|seg| seg.range.end <= offset);
        self.segments
            .get(idx)
            .filter(|seg| seg.range.contains(&offset))
            .map(|seg| seg.style)
    }

    /// Character offset of the first `'\n'` at or after `offset`, or the end
    /// of the buffer when there is none.
    pub fn find_newline_from(&self, offset: usize) -> usize {
        self.text
            .chars()
            .enumerate()
            .skip(offset)
            .find(|(_, c)| *c == '\n')
            .map_or(self.char_len, |(i, _)| i)
    }

    /// Characters in `range`, collected into a new string.
    pub fn slice_chars(&self, range: Range<usize>) -> String {
        self.text
            .chars()
            .skip(range.start)
            .take(range.end.saturating_sub(range.start))
            .collect()
    }

    /// Character offset at which each line starts.
    pub fn line_starts(&self) -> Vec<usize> {
        let mut starts = vec![0];
        starts.extend(
            self.text
                .chars()
                .enumerate()
                .filter(|(_, c)| *c == '\n')
                .map(|(i, _)| i + 1),
        );
        starts
    }

    /// Text of line `row` without its trailing newline.
    pub fn line(&self, row: usize) -> Option<&str> {
        self.text.split('\n').nth(row)
    }

    /// Map a `(row, column)` position, both counted in characters, to a buffer
    /// offset. Columns past the end of the line clamp to the line's newline.
    pub fn offset_at(&self, row: usize, column: usize) -> Option<usize> {
        let line = self.line(row)?;
        let start = *self.line_starts().get(row)?;
        Some(start + column.min(line.chars().count()))
    }

    /// The buffer split into display lines of `(text, style)` runs.
    pub fn styled_lines(&self) -> Vec<Vec<(&str, TextStyle)>> {
        let mut lines: Vec<Vec<(&str, TextStyle)>> = vec![Vec::new()];
        for seg in &self.segments {
            let slice = &self.text[seg.bytes.clone()];
            for (i, part) in slice.split('\n').enumerate() {
                if i > 0 {
                    lines.push(Vec::new());
                }
                if !part.is_empty() {
                    if let Some(line) = lines.last_mut() {
                        line.push((part, seg.style));
                    }
                }
            }
        }
        lines
    }
}

/// Clickable headline region: `start..end` in characters, mapped to a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleSpan {
    pub start: usize,
    pub end: usize,
    pub url: String,
}

impl TitleSpan {
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Pointer shape to present while hovering the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Arrow,
    /// Pointing hand over a headline.
    Pointer,
}

/// Find the URL whose title span contains `offset`.
pub fn resolve_click(offset: usize, spans: &[TitleSpan]) -> Option<&str> {
    spans
        .iter()
        .find(|span| span.contains(offset))
        .map(|span| span.url.as_str())
}

/// Pointer shape for the character under the pointer; `None` means the
/// pointer is outside the text.
pub fn resolve_hover(offset: Option<usize>, text: &StyledText) -> CursorStyle {
    match offset.and_then(|o| text.style_at(o)) {
        Some(TextStyle::Title) => CursorStyle::Pointer,
        _ => CursorStyle::Arrow,
    }
}

/// Result of one render pass: the text and its clickable spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedOutput {
    pub text: StyledText,
    pub spans: Vec<TitleSpan>,
}

impl RenderedOutput {
    /// Output holding a single styled message and no spans.
    pub fn message(text: &str, style: TextStyle) -> Self {
        let mut out = Self::default();
        out.text.push(text, style);
        out
    }
}

/// Read-mostly output area of a screen.
#[derive(Debug, Default)]
pub struct OutputRegion {
    content: RenderedOutput,
    writable: bool,
}

impl OutputRegion {
    pub fn new(initial: RenderedOutput) -> Self {
        Self {
            content: initial,
            writable: false,
        }
    }

    pub fn text(&self) -> &StyledText {
        &self.content.text
    }

    pub fn spans(&self) -> &[TitleSpan] {
        &self.content.spans
    }

    #[cfg(test)]
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Open the region for writing until the returned writer is dropped.
    pub fn begin_update(&mut self) -> OutputWriter<'_> {
        self.writable = true;
        OutputWriter { region: self }
    }
}

/// Write access to an [`OutputRegion`]; closes the region on drop.
#[derive(Debug)]
pub struct OutputWriter<'a> {
    region: &'a mut OutputRegion,
}

impl OutputWriter<'_> {
    pub fn clear(&mut self) {
        self.region.content = RenderedOutput::default();
    }

    pub fn push(&mut self, text: &str, style: TextStyle) {
        self.region.content.text.push(text, style);
    }

    pub fn replace(&mut self, content: RenderedOutput) {
        self.region.content = content;
    }

    #[cfg(test)]
    pub fn is_writable(&self) -> bool {
        self.region.writable
    }
}

impl Drop for OutputWriter<'_> {
    fn drop(&mut self) {
        self.region.writable = false;
    }
}
