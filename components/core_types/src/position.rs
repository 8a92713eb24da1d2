//! Source position tracking.
//!
//! Every token and tree node carries a [`Position`] describing where in
//! the input it was found. Besides the absolute line number, the position
//! keeps page, page-line and paragraph counters which the lexer bumps on
//! form feeds and blank lines.

use std::fmt;

/// Location of a token in the input.
///
/// The only guaranteed textual form is `filename:line:`, as produced by the
/// [`Display`](fmt::Display) implementation.
///
/// # Examples
///
/// ```
/// use core_types::Position;
///
/// let mut pos = Position::new("script.js");
/// pos.new_line();
/// pos.new_line();
///
/// assert_eq!(pos.line(), 3);
/// assert_eq!(pos.to_string(), "script.js:3:");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    filename: String,
    function: String,
    page: u32,
    page_line: u32,
    paragraph: u32,
    line: u32,
}

impl Default for Position {
    fn default() -> Self {
        Position {
            filename: String::new(),
            function: String::new(),
            page: 1,
            page_line: 1,
            paragraph: 1,
            line: 1,
        }
    }
}

impl Position {
    /// Create a position at the start of `filename`.
    pub fn new(filename: impl Into<String>) -> Self {
        Position {
            filename: filename.into(),
            ..Position::default()
        }
    }

    /// Change the filename.
    pub fn set_filename(&mut self, filename: impl Into<String>) {
        self.filename = filename.into();
    }

    /// Change the name of the function being parsed.
    pub fn set_function(&mut self, function: impl Into<String>) {
        self.function = function.into();
    }

    /// Reset all the counters to 1, except the line which is set to `line`.
    pub fn reset_counters(&mut self, line: u32) {
        self.page = 1;
        self.page_line = 1;
        self.paragraph = 1;
        self.line = line;
    }

    /// A form feed was found: start a new page.
    pub fn new_page(&mut self) {
        self.page += 1;
        self.page_line = 1;
        self.paragraph = 1;
    }

    /// An empty line was found: start a new paragraph.
    pub fn new_paragraph(&mut self) {
        self.paragraph += 1;
    }

    /// A line terminator was found.
    pub fn new_line(&mut self) {
        self.page_line += 1;
        self.line += 1;
    }

    /// Name of the input file (may be empty).
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Name of the function being parsed (may be empty).
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Current page, starting at 1.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Line within the current page, starting at 1.
    pub fn page_line(&self) -> u32 {
        self.page_line
    }

    /// Paragraph within the current page, starting at 1.
    pub fn paragraph(&self) -> u32 {
        self.paragraph
    }

    /// Absolute line number, starting at 1.
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:", self.filename, self.line)
    }
}
