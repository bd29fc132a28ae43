/// A cursor for character-by-character marker scanning with position tracking.
///
/// Operates over a line of text while tracking the absolute byte position
/// in the document (via `base` offset).
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The line being scanned.
    pub s: &'a str,
    /// Byte offset of `s` in the document.
    pub base: usize,
    /// Current local byte index into `s`, always on a char boundary.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str, base: usize) -> Self {
        Self { s, base, i: 0 }
    }

    /// Current absolute byte position (base + local index).
    pub fn pos(&self) -> usize {
        self.base + self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Peeks at the current character without advancing.
    pub fn peek(&self) -> Option<char> {
        self.s.get(self.i..)?.chars().next()
    }

    /// Checks if the remaining input starts with `pat`.
    pub fn starts_with(&self, pat: &str) -> bool {
        self.s
            .get(self.i..)
            .is_some_and(|rest| rest.starts_with(pat))
    }

    /// Checks if the text before the cursor ends with `pat`.
    pub fn preceded_by(&self, pat: &str) -> bool {
        self.s[..self.i].ends_with(pat)
    }

    /// Advances by one character, returning it.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.i += c.len_utf8();
        Some(c)
    }
}
