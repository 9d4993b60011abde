pub mod client;
pub mod prompts;

pub use client::*;
pub use prompts::*;

use async_trait::async_trait;

use crate::models::{AnnotationError, ArticleAnnotation};

/// External analysis collaborator: (title, abstract) → structured annotation.
///
/// Implementations surface failures as [`AnnotationError`] so the caller can
/// substitute the matching sentinel annotation; they never abort a batch.
/// Pacing between calls is owned by the caller, not the implementation.
#[async_trait]
pub trait Annotator {
    async fn annotate(
        &self,
        title: &str,
        abstract_text: &str,
    ) -> Result<ArticleAnnotation, AnnotationError>;
}
