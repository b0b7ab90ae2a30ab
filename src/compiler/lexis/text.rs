/// Line oriented cursor over the source text.
#[derive(Clone, Default)]
pub struct Reader {
    lines: Vec<String>,
    line: usize,
    column: usize,
}

impl Reader {
    #[must_use]
    pub fn new(code: &str) -> Reader {
        let lines = code
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        Reader {
            lines,
            line: 0,
            column: 0,
        }
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.line >= self.lines.len()
    }

    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Remainder of the current line, empty once the line is consumed.
    #[must_use]
    pub fn rest(&self) -> &str {
        self.lines
            .get(self.line)
            .and_then(|line| line.get(self.column..))
            .unwrap_or_default()
    }

    pub fn skip_blanks(&mut self) {
        let skipped = self
            .rest()
            .bytes()
            .take_while(|c| *c == b' ' || *c == b'\t')
            .count();
        self.column += skipped;
    }

    pub fn forward(&mut self, size: usize) {
        self.column += size;
    }

    pub fn next_line(&mut self) {
        self.line += 1;
        self.column = 0;
    }
}
