//! Location of the value being read, relative to the read root.
//!
//! Paths only ever grow by copying: [`Path::key`] and [`Path::index`] return a
//! new path, so sibling branches never observe each other's labels.

use std::fmt;

/// One step from a parent value to a child.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Struct field or map key.
    Key(String),
    /// Sequence element.
    Index(usize),
}

/// Ordered labels from the read root to the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The empty path of the read root.
    pub fn root() -> Self {
        Self::default()
    }

    /// A copy of this path extended by a field or key label.
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.child(Segment::Key(key.into()))
    }

    /// A copy of this path extended by a sequence index.
    pub fn index(&self, index: usize) -> Self {
        self.child(Segment::Index(index))
    }

    fn child(&self, segment: Segment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment);
        Self { segments }
    }

    /// Number of labels, which is also the current read depth.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for Path {
    /// Keys are joined with `.`, indices render as `[i]`: `a.b[2].c`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if position == 0 => f.write_str(key)?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_keys_and_indices() {
        let path = Path::root().key("a").key("b").index(2).key("c");
        assert_eq!(path.to_string(), "a.b[2].c");
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn leading_index_has_no_separator() {
        assert_eq!(Path::root().index(0).key("name").to_string(), "[0].name");
    }

    #[test]
    fn descending_does_not_touch_the_parent() {
        let parent = Path::root().key("items");
        let first = parent.index(0);
        let second = parent.index(1);

        assert_eq!(parent.len(), 1);
        assert_eq!(first.segments()[1], Segment::Index(0));
        assert_eq!(second.segments()[1], Segment::Index(1));
    }
}
