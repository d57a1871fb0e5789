//! Rich text run model for inline note content.
//!
//! # Responsibility
//! - Hold plain text plus bold/italic/underline spans as a serializable value.
//! - Provide scoped formatting toggles and text replacement over char ranges.
//!
//! # Invariants
//! - Offsets are `char` offsets, never byte offsets.
//! - Spans are non-empty, inside the text, sorted by `(mark, start)`, and
//!   spans of the same mark never overlap or touch (they are merged).
//! - Only the three `Mark` variants can ever be represented.

use serde::{Deserialize, Serialize};

/// Inline formatting mark allowed in note content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    Bold,
    Italic,
    Underline,
}

impl Mark {
    /// All marks in canonical nesting order (outermost first).
    pub const ALL: [Mark; 3] = [Mark::Bold, Mark::Italic, Mark::Underline];

    fn bit(self) -> u8 {
        match self {
            Self::Bold => 0b001,
            Self::Italic => 0b010,
            Self::Underline => 0b100,
        }
    }
}

/// Small set of marks active on one character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MarkSet(u8);

impl MarkSet {
    pub const EMPTY: Self = Self(0);

    pub fn contains(self, mark: Mark) -> bool {
        self.0 & mark.bit() != 0
    }

    pub fn with(self, mark: Mark) -> Self {
        Self(self.0 | mark.bit())
    }

    pub fn without(self, mark: Mark) -> Self {
        Self(self.0 & !mark.bit())
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Marks in canonical order.
    pub fn iter(self) -> impl Iterator<Item = Mark> {
        Mark::ALL.into_iter().filter(move |mark| self.contains(*mark))
    }
}

/// Half-open `[start, end)` char range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    /// Builds a range from two offsets in any order.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Clamps both ends into `[0, len]`.
    pub fn clamped(self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }
}

/// One run of a single mark over `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkSpan {
    pub mark: Mark,
    pub start: usize,
    pub end: usize,
}

#[derive(Deserialize)]
struct RichTextWire {
    text: String,
    #[serde(default)]
    spans: Vec<MarkSpan>,
}

/// Plain text with bold/italic/underline spans.
///
/// Deserialization normalizes spans (clamping, merging, dropping empties)
/// so a stored value always satisfies the module invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RichTextWire")]
pub struct RichText {
    text: String,
    spans: Vec<MarkSpan>,
}

impl From<RichTextWire> for RichText {
    fn from(value: RichTextWire) -> Self {
        let len = value.text.chars().count();
        let mut marks = vec![MarkSet::EMPTY; len];
        for span in &value.spans {
            let range = TextRange::new(span.start, span.end).clamped(len);
            for slot in &mut marks[range.start..range.end] {
                *slot = slot.with(span.mark);
            }
        }
        Self::from_char_marks(value.text, &marks)
    }
}

impl RichText {
    /// Unformatted text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }

    /// Builds a value from text and one mark set per char.
    ///
    /// Missing trailing entries are treated as unmarked.
    pub fn from_char_marks(text: String, marks: &[MarkSet]) -> Self {
        let len = text.chars().count();
        let mut spans = Vec::new();
        for mark in Mark::ALL {
            let mut run_start: Option<usize> = None;
            for index in 0..=len {
                let active = index < len
                    && marks
                        .get(index)
                        .copied()
                        .unwrap_or_default()
                        .contains(mark);
                match (active, run_start) {
                    (true, None) => run_start = Some(index),
                    (false, Some(start)) => {
                        spans.push(MarkSpan {
                            mark,
                            start,
                            end: index,
                        });
                        run_start = None;
                    }
                    _ => {}
                }
            }
        }
        Self { text, spans }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn spans(&self) -> &[MarkSpan] {
        &self.spans
    }

    /// Length in chars.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns whether any formatting is present.
    pub fn has_marks(&self) -> bool {
        !self.spans.is_empty()
    }

    /// Expands spans into one mark set per char.
    pub fn char_marks(&self) -> Vec<MarkSet> {
        let mut marks = vec![MarkSet::EMPTY; self.char_len()];
        for span in &self.spans {
            for slot in &mut marks[span.start..span.end] {
                *slot = slot.with(span.mark);
            }
        }
        marks
    }

    /// Marks active on the char at `index`.
    pub fn marks_at(&self, index: usize) -> MarkSet {
        self.spans
            .iter()
            .filter(|span| span.start <= index && index < span.end)
            .fold(MarkSet::EMPTY, |set, span| set.with(span.mark))
    }

    /// Returns whether every char in a non-empty `range` carries `mark`.
    pub fn is_marked(&self, mark: Mark, range: TextRange) -> bool {
        let range = range.clamped(self.char_len());
        if range.is_empty() {
            return false;
        }
        self.spans
            .iter()
            .any(|span| span.mark == mark && span.start <= range.start && range.end <= span.end)
    }

    /// Toggles `mark` strictly inside `range`.
    ///
    /// When the whole range already carries the mark it is removed there;
    /// otherwise it is applied to the whole range. Returns the mark state
    /// of the range after the toggle, or `None` when the range is empty.
    pub fn toggle_mark(&mut self, mark: Mark, range: TextRange) -> Option<bool> {
        let range = range.clamped(self.char_len());
        if range.is_empty() {
            return None;
        }
        let apply = !self.is_marked(mark, range);
        let mut marks = self.char_marks();
        for slot in &mut marks[range.start..range.end] {
            *slot = if apply {
                slot.with(mark)
            } else {
                slot.without(mark)
            };
        }
        *self = Self::from_char_marks(std::mem::take(&mut self.text), &marks);
        Some(apply)
    }

    /// Replaces `range` with `insert`; returns the caret offset after the insert.
    ///
    /// Inserted chars inherit the marks of the char before the range, or of
    /// the first replaced char when the range starts at offset zero.
    pub fn replace_range(&mut self, range: TextRange, insert: &str) -> usize {
        let range = range.clamped(self.char_len());
        let marks = self.char_marks();
        let inherited = if range.start > 0 {
            marks[range.start - 1]
        } else {
            marks.get(range.start).copied().unwrap_or_default()
        };

        let inserted_len = insert.chars().count();
        let mut text = String::with_capacity(self.text.len() + insert.len());
        let mut next_marks = Vec::with_capacity(marks.len() + inserted_len);
        for (index, ch) in self.text.chars().enumerate() {
            if index == range.start {
                text.push_str(insert);
                next_marks.extend(std::iter::repeat(inherited).take(inserted_len));
            }
            if index < range.start || index >= range.end {
                text.push(ch);
                next_marks.push(marks[index]);
            }
        }
        if range.start == marks.len() {
            text.push_str(insert);
            next_marks.extend(std::iter::repeat(inherited).take(inserted_len));
        }

        *self = Self::from_char_marks(text, &next_marks);
        range.start + inserted_len
    }

    /// Splits the content into maximal runs sharing the same mark set.
    pub fn segments(&self) -> Vec<(MarkSet, String)> {
        let marks = self.char_marks();
        let mut segments: Vec<(MarkSet, String)> = Vec::new();
        for (ch, set) in self.text.chars().zip(marks) {
            match segments.last_mut() {
                Some((current, buffer)) if *current == set => buffer.push(ch),
                _ => segments.push((set, ch.to_string())),
            }
        }
        segments
    }
}
