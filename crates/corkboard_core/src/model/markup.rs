//! Markup interchange for `RichText`.
//!
//! # Responsibility
//! - Sanitize an HTML-like fragment read back from an editable region into
//!   a `RichText` value.
//! - Render a `RichText` value as a properly nested fragment.
//!
//! # Invariants
//! - Only `b/strong`, `i/em` and `u` survive parsing; every other tag is
//!   dropped (its text content is kept, except `script`/`style` bodies).
//! - Parsing never fails; malformed nesting degrades to the closest
//!   representable formatting.

use crate::model::rich_text::{Mark, MarkSet, RichText};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<!--.*?-->|<(/?)([A-Za-z][A-Za-z0-9]*)\b(?:"[^"]*"|'[^']*'|[^'">])*?(/?)>"#)
        .expect("valid tag regex")
});
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z]{2,8});").expect("valid entity regex"));

fn tag_mark(name: &str) -> Option<Mark> {
    match name {
        "b" | "strong" => Some(Mark::Bold),
        "i" | "em" => Some(Mark::Italic),
        "u" => Some(Mark::Underline),
        _ => None,
    }
}

fn is_block(name: &str) -> bool {
    matches!(name, "div" | "p" | "li" | "ul" | "ol" | "h1" | "h2" | "h3" | "blockquote")
}

#[derive(Default)]
struct MarkupBuilder {
    text: String,
    marks: Vec<MarkSet>,
    depth: [usize; 3],
}

impl MarkupBuilder {
    fn active(&self) -> MarkSet {
        Mark::ALL
            .into_iter()
            .zip(self.depth)
            .filter(|(_, depth)| *depth > 0)
            .fold(MarkSet::EMPTY, |set, (mark, _)| set.with(mark))
    }

    fn push_str(&mut self, value: &str) {
        let active = self.active();
        for ch in value.chars().filter(|ch| *ch != '\r') {
            self.text.push(ch);
            self.marks.push(active);
        }
    }

    fn push_break(&mut self) {
        self.text.push('\n');
        self.marks.push(MarkSet::EMPTY);
    }

    fn open(&mut self, mark: Mark) {
        self.depth[mark_slot(mark)] += 1;
    }

    fn close(&mut self, mark: Mark) {
        let slot = &mut self.depth[mark_slot(mark)];
        *slot = slot.saturating_sub(1);
    }

    fn finish(self) -> RichText {
        RichText::from_char_marks(self.text, &self.marks)
    }
}

fn mark_slot(mark: Mark) -> usize {
    match mark {
        Mark::Bold => 0,
        Mark::Italic => 1,
        Mark::Underline => 2,
    }
}

impl RichText {
    /// Sanitizes a fragment read back from an editable region.
    pub fn from_markup(source: &str) -> Self {
        parse_markup(source)
    }

    pub fn to_markup(&self) -> String {
        render_markup(self)
    }
}

/// Parses and sanitizes a markup fragment.
pub fn parse_markup(source: &str) -> RichText {
    let mut builder = MarkupBuilder::default();
    let mut cursor = 0;
    let mut skip_until: Option<String> = None;

    for caps in TAG_RE.captures_iter(source) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if skip_until.is_none() {
            builder.push_str(&decode_entities(&source[cursor..whole.start()]));
        }
        cursor = whole.end();

        let Some(name) = caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) else {
            // comment
            continue;
        };
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let self_closing = caps.get(3).is_some_and(|m| !m.as_str().is_empty());

        if let Some(skipped) = skip_until.as_deref() {
            if closing && skipped == name {
                skip_until = None;
            }
            continue;
        }

        if matches!(name.as_str(), "script" | "style") {
            if !closing && !self_closing {
                skip_until = Some(name);
            }
            continue;
        }

        if name == "br" {
            builder.push_break();
            continue;
        }

        if let Some(mark) = tag_mark(&name) {
            if self_closing {
                continue;
            }
            if closing {
                builder.close(mark);
            } else {
                builder.open(mark);
            }
            continue;
        }

        if is_block(&name) && !closing && !builder.text.is_empty() && !builder.text.ends_with('\n')
        {
            builder.push_break();
        }
    }

    if skip_until.is_none() {
        builder.push_str(&decode_entities(&source[cursor..]));
    }
    builder.finish()
}

/// Renders rich text as a nested markup fragment (`b` outermost, `u` innermost).
pub fn render_markup(text: &RichText) -> String {
    let mut out = String::with_capacity(text.text().len() + text.spans().len() * 7);
    for (marks, segment) in text.segments() {
        for mark in marks.iter() {
            out.push_str(open_tag(mark));
        }
        for ch in segment.chars() {
            match ch {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '\n' => out.push_str("<br>"),
                other => out.push(other),
            }
        }
        let mut closing: Vec<Mark> = marks.iter().collect();
        closing.reverse();
        for mark in closing {
            out.push_str(close_tag(mark));
        }
    }
    out
}

fn open_tag(mark: Mark) -> &'static str {
    match mark {
        Mark::Bold => "<b>",
        Mark::Italic => "<i>",
        Mark::Underline => "<u>",
    }
}

fn close_tag(mark: Mark) -> &'static str {
    match mark {
        Mark::Bold => "</b>",
        Mark::Italic => "</i>",
        Mark::Underline => "</u>",
    }
}

fn decode_entities(value: &str) -> String {
    ENTITY_RE
        .replace_all(value, |caps: &Captures<'_>| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match body {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), |ch| ch.to_string())
        })
        .into_owned()
}
