pub mod io;
pub mod llm;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod quality;
pub mod source;

pub use io::{Database, Ledger};
pub use llm::{AnthropicClient, AnthropicConfig, Annotator};
pub use models::{
    AnnotationError, ArticleAnnotation, CandidateRecord, EnrichedRecord, NO_ABSTRACT, RawArticle,
    SkipReason,
};
pub use normalize::normalize_article;
pub use pipeline::{PipelineConfig, RunOutcome, run_pipeline};
pub use quality::JournalRatings;
pub use source::{EuropePmcClient, LiteratureSource};
