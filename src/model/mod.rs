//! Data models for ccview
//!
//! This module contains client-independent data structures representing
//! ClearCase history and annotations.

mod annotation;
mod history;

pub use annotation::{Annotation, AnnotationLine};
pub use history::{History, HistoryEntry};
