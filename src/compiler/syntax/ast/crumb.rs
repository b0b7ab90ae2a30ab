use std::fmt::{self, Display};
use std::rc::Rc;

use crate::constants::common::{PATH_SEPARATOR, ROOT_PATH};
use crate::util::common::Arr;

pub type Identifier = String;

/// A 0-based position inside the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpanPos {
    pub line: usize,
    pub column: usize,
}

impl SpanPos {
    #[must_use]
    pub fn new(line: usize, column: usize) -> SpanPos {
        SpanPos { line, column }
    }
}

impl Display for SpanPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let SpanPos { line, column } = self;
        write!(f, "{}:{}", line + 1, column + 1)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: SpanPos,
    pub end: SpanPos,
}

impl Span {
    #[must_use]
    pub fn new(start: SpanPos, end: SpanPos) -> Span {
        Span { start, end }
    }

    #[must_use]
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }

    #[must_use]
    pub fn line(&self) -> usize {
        self.start.line
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Span { start, end } = self;
        write!(f, "{start}-{end}")
    }
}

/// Colon separated name such as `World:Room1`.
///
/// Paths produced by the parser always hold at least one segment. The
/// namespace prefix of a single-segment path is the empty path, which
/// stands for the root of the scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path(pub Arr<Identifier>);

impl Path {
    #[must_use]
    pub fn root() -> Path {
        Path(Rc::from([]))
    }

    #[must_use]
    pub fn single(name: &str) -> Path {
        Path(Rc::from([name.to_string()]))
    }

    /// Every segment but the last one.
    #[must_use]
    pub fn beginning(&self) -> Path {
        let Path(segments) = self;
        let prefix = segments.len().saturating_sub(1);
        Path(segments[..prefix].into())
    }

    #[must_use]
    pub fn last(&self) -> Option<&Identifier> {
        let Path(segments) = self;
        segments.last()
    }

    /// Appends `name` to this path, yielding the qualified name of a child.
    #[must_use]
    pub fn join(&self, name: &str) -> Path {
        let Path(segments) = self;
        let joined = segments
            .iter()
            .cloned()
            .chain([name.to_string()])
            .collect::<Arr<_>>();
        Path(joined)
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Identifier> {
        self.0.iter()
    }
}

impl From<&[&str]> for Path {
    fn from(segments: &[&str]) -> Path {
        Path(segments.iter().map(ToString::to_string).collect())
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, "{ROOT_PATH}");
        }
        let Path(segments) = self;
        write!(f, "{}", segments.join(PATH_SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beginning_and_last() {
        let path = Path::from(["World", "Room1", "Lamp"].as_slice());
        assert_eq!(path.beginning(), Path::from(["World", "Room1"].as_slice()));
        assert_eq!(path.last().map(String::as_str), Some("Lamp"));
    }

    #[test]
    fn test_single_segment_prefix_is_root() {
        let path = Path::single("World");
        assert!(path.beginning().is_root());
        assert_eq!(path.beginning().to_string(), "()");
    }

    #[test]
    fn test_join_and_display() {
        let path = Path::single("a").join("b").join("c");
        assert_eq!(path.to_string(), "a:b:c");
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_paths_compare_structurally() {
        let left = Path::single("World").join("Room");
        let right = Path::from(["World", "Room"].as_slice());
        assert_eq!(left, right);
    }

    #[test]
    fn test_span_pos_displays_one_based() {
        assert_eq!(SpanPos::new(0, 4).to_string(), "1:5");
    }
}
