//! Annotation parser (cleartool annotate)

use super::super::ClearCaseError;
use super::super::template::FIELD_SEPARATOR;
use super::Parser;
use crate::model::{Annotation, AnnotationLine};

impl Parser {
    /// Parse complete `cleartool annotate -fmt "%u|%Vn|"` output
    pub fn parse_annotate(output: &str, file_name: &str) -> Result<Annotation, ClearCaseError> {
        let mut annotation = Annotation::new(file_name.to_string());
        for (index, line) in output.lines().enumerate() {
            Self::push_annotate_line(&mut annotation, index + 1, line)?;
        }
        Ok(annotation)
    }

    /// Append one line of annotate output to `annotation`
    ///
    /// Empty lines are skipped. A malformed line fails the whole annotation:
    /// dropping it would shift every following line onto the wrong source
    /// line. `line_number` is 1-based and only used in the error.
    pub fn push_annotate_line(
        annotation: &mut Annotation,
        line_number: usize,
        line: &str,
    ) -> Result<(), ClearCaseError> {
        if line.is_empty() {
            return Ok(());
        }
        let parsed = Self::parse_annotate_line(line)
            .ok_or_else(|| Self::malformed_annotate_line(line_number, line))?;
        annotation.add_line(parsed.revision, parsed.author, parsed.present);
        Ok(())
    }

    /// Parse a single line of annotate output
    ///
    /// Format: `<user>|<version path>|<source text>`
    /// Example: `JDoe|\main\br\3|int main(void)`
    ///
    /// Returns `None` when the version field is missing or empty, or when
    /// the delimiter after it is absent.
    pub fn parse_annotate_line(line: &str) -> Option<AnnotationLine> {
        let mut fields = line.splitn(3, FIELD_SEPARATOR);
        let author = fields.next()?;
        let revision = fields.next().filter(|r| !r.is_empty())?;
        fields.next()?;

        Some(AnnotationLine {
            revision: Self::normalize_revision(revision),
            author: author.to_lowercase(),
            present: true,
        })
    }

    fn malformed_annotate_line(line_number: usize, line: &str) -> ClearCaseError {
        ClearCaseError::Parse(format!(
            "annotate output line {} is not a user|version| record: {:?}",
            line_number, line
        ))
    }
}
