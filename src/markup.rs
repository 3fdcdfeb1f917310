//! Glyph text and color markup.
//!
//! Plain output is one ramp glyph per sample, each row terminated by `\n`.
//! Color output wraps every glyph in a span carrying the sample's RGB:
//!
//! ```text
//! <span style="color:rgb(R,G,B)">C</span><span ...>C</span>\n
//! ```
//!
//! Glyphs follow each other with nothing in between. `&`, `<` and `>` are
//! written as `&amp;`, `&lt;` and `&gt;`. The parser only accepts exactly this
//! shape; it is not an HTML parser.

use crate::grid::SampleGrid;
use crate::ramp;
use crate::{AsciiError, Result};
use std::fmt;
use std::str::FromStr;

const OPEN_PREFIX: &str = "<span style=\"color:rgb(";
const OPEN_SUFFIX: &str = ")\">";
const CLOSE: &str = "</span>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Plain,
    Color,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(Mode::Plain),
            "color" | "colour" => Ok(Mode::Color),
            other => Err(format!("unknown mode {other:?}, expected plain or color")),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Plain => "plain",
            Mode::Color => "color",
        })
    }
}

/// A glyph together with the color it is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColoredGlyph {
    pub ch: char,
    pub rgb: [u8; 3],
}

/// Text produced from a sample grid, plain or color annotated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    mode: Mode,
    width: u32,
    height: u32,
    body: String,
}

impl RenderedOutput {
    /// Wrap text produced elsewhere, e.g. read back from a host page.
    /// Nothing is validated until the output is parsed.
    pub fn from_parts(mode: Mode, width: u32, height: u32, body: impl Into<String>) -> Self {
        Self { mode, width, height, body: body.into() }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_str(&self) -> &str {
        &self.body
    }

    /// Parse the output back into rows of glyphs.
    ///
    /// Plain glyphs come back black. Fails with `MalformedMarkup` on any row
    /// that does not match the format, and when the row count or row width
    /// differs from the declared dimensions.
    pub fn glyph_rows(&self) -> Result<Vec<Vec<ColoredGlyph>>> {
        let body = self.body.strip_suffix('\n').unwrap_or(&self.body);
        let lines: Vec<&str> = if body.is_empty() { Vec::new() } else { body.split('\n').collect() };

        if lines.len() != self.height as usize {
            return Err(malformed(
                lines.len() + 1,
                1,
                format!("expected {} rows, found {}", self.height, lines.len()),
            ));
        }

        let mut rows = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            let line_no = i + 1;
            let row = match self.mode {
                Mode::Plain => parse_plain_line(line, line_no)?,
                Mode::Color => parse_color_line(line, line_no)?,
            };
            if row.len() != self.width as usize {
                return Err(malformed(
                    line_no,
                    line.len() + 1,
                    format!("expected {} glyphs, found {}", self.width, row.len()),
                ));
            }
            rows.push(row);
        }
        Ok(rows)
    }
}

/// Map every sample to its ramp glyph.
pub fn to_glyphs(grid: &SampleGrid, mode: Mode) -> RenderedOutput {
    let per_glyph = match mode {
        Mode::Plain => 1,
        Mode::Color => OPEN_PREFIX.len() + OPEN_SUFFIX.len() + CLOSE.len() + 16,
    };
    let mut body = String::with_capacity((grid.sample_count() + grid.height() as usize) * per_glyph);

    for row in grid.rows() {
        for &rgb in row {
            let ch = ramp::glyph_for(rgb);
            match mode {
                Mode::Plain => body.push(ch),
                Mode::Color => {
                    body.push_str(OPEN_PREFIX);
                    body.push_str(&format!("{},{},{}", rgb[0], rgb[1], rgb[2]));
                    body.push_str(OPEN_SUFFIX);
                    push_escaped(&mut body, ch);
                    body.push_str(CLOSE);
                }
            }
        }
        body.push('\n');
    }

    RenderedOutput { mode, width: grid.width(), height: grid.height(), body }
}

/// Raw glyph grid with annotations stripped, one row per line.
pub fn to_text(output: &RenderedOutput) -> Result<String> {
    let rows = output.glyph_rows()?;
    let mut text = String::with_capacity(rows.len() * (output.width() as usize + 1));
    for row in rows {
        text.extend(row.iter().map(|g| g.ch));
        text.push('\n');
    }
    Ok(text)
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        c => out.push(c),
    }
}

fn malformed(line: usize, column: usize, reason: impl Into<String>) -> AsciiError {
    AsciiError::MalformedMarkup { line, column, reason: reason.into() }
}

fn check_glyph(ch: char, line: usize, column: usize) -> Result<()> {
    if !ch.is_ascii() {
        return Err(malformed(line, column, format!("multi-byte glyph {ch:?} is not supported")));
    }
    if !ramp::contains(ch) {
        return Err(malformed(line, column, format!("glyph {ch:?} is not in the ramp")));
    }
    Ok(())
}

fn parse_plain_line(line: &str, line_no: usize) -> Result<Vec<ColoredGlyph>> {
    line.char_indices()
        .map(|(pos, ch)| {
            check_glyph(ch, line_no, pos + 1)?;
            Ok(ColoredGlyph { ch, rgb: [0, 0, 0] })
        })
        .collect()
}

/// Tokenize one row of color markup.
pub fn parse_color_line(line: &str, line_no: usize) -> Result<Vec<ColoredGlyph>> {
    let mut cursor = Cursor { line, pos: 0, line_no };
    let mut glyphs = Vec::new();

    while !cursor.at_end() {
        cursor.expect(OPEN_PREFIX)?;
        let r = cursor.channel()?;
        cursor.expect(",")?;
        let g = cursor.channel()?;
        cursor.expect(",")?;
        let b = cursor.channel()?;
        cursor.expect(OPEN_SUFFIX)?;
        let ch = cursor.glyph()?;
        cursor.expect(CLOSE)?;
        glyphs.push(ColoredGlyph { ch, rgb: [r, g, b] });
    }
    Ok(glyphs)
}

struct Cursor<'a> {
    line: &'a str,
    pos: usize,
    line_no: usize,
}

impl Cursor<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.line.len()
    }

    fn rest(&self) -> &str {
        &self.line[self.pos..]
    }

    fn error(&self, reason: impl Into<String>) -> AsciiError {
        malformed(self.line_no, self.pos + 1, reason)
    }

    fn expect(&mut self, token: &str) -> Result<()> {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            Ok(())
        } else {
            Err(self.error(format!("expected {token:?}")))
        }
    }

    fn channel(&mut self) -> Result<u8> {
        let digits = self.rest().bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || digits > 3 {
            return Err(self.error("expected a color channel 0-255"));
        }
        let value: u16 = self.rest()[..digits]
            .parse()
            .map_err(|_| self.error("expected a color channel 0-255"))?;
        let value = u8::try_from(value).map_err(|_| self.error(format!("channel {value} exceeds 255")))?;
        self.pos += digits;
        Ok(value)
    }

    fn glyph(&mut self) -> Result<char> {
        for (entity, ch) in [("&amp;", '&'), ("&lt;", '<'), ("&gt;", '>')] {
            if self.rest().starts_with(entity) {
                check_glyph(ch, self.line_no, self.pos + 1)?;
                self.pos += entity.len();
                return Ok(ch);
            }
        }
        if self.rest().starts_with(CLOSE) {
            return Err(self.error("empty glyph"));
        }
        let ch = self.rest().chars().next().ok_or_else(|| self.error("unexpected end of row"))?;
        if matches!(ch, '<' | '&') {
            return Err(self.error(format!("unescaped {ch:?} in glyph")));
        }
        check_glyph(ch, self.line_no, self.pos + 1)?;
        self.pos += ch.len_utf8();
        Ok(ch)
    }
}
