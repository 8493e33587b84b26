//! Annotation (blame) data model

/// Authorship of a single source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationLine {
    /// Version path that last changed the line, `/`-separated
    pub revision: String,
    /// Author, lower-cased so the same user matches across revisions
    pub author: String,
    /// Whether the line exists in the annotated version
    pub present: bool,
}

/// Authorship for an entire file, one entry per source line in order
#[derive(Debug, Clone, Default)]
pub struct Annotation {
    /// Name of the annotated file
    pub file_name: String,
    /// Annotation lines
    pub lines: Vec<AnnotationLine>,
}

impl Annotation {
    /// Create new empty annotation
    pub fn new(file_name: String) -> Self {
        Self {
            file_name,
            lines: Vec::new(),
        }
    }

    /// Append the next line's authorship
    pub fn add_line(&mut self, revision: String, author: String, present: bool) {
        self.lines.push(AnnotationLine {
            revision,
            author,
            present,
        });
    }

    /// Check if content is empty
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get line count
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Revision of a 1-based line number
    pub fn revision(&self, line: usize) -> Option<&str> {
        self.line(line).map(|l| l.revision.as_str())
    }

    /// Author of a 1-based line number
    pub fn author(&self, line: usize) -> Option<&str> {
        self.line(line).map(|l| l.author.as_str())
    }

    fn line(&self, line: usize) -> Option<&AnnotationLine> {
        line.checked_sub(1).and_then(|i| self.lines.get(i))
    }
}
