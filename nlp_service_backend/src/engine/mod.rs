// backend/src/engine/mod.rs

mod lexicon;
mod rule_based;

pub use rule_based::RuleBasedEngine;

use thiserror::Error;

use crate::models::{Entity, EntityType, Language, NamedEntity, PosTag};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("document contains no words")]
    EmptyDocument,
    #[error("analysis failed: {0}")]
    Analysis(String),
}

pub trait AnalysisEngine: Send + Sync {
    fn load(&self, text: &str) -> Result<Box<dyn AnalyzedDocument>, EngineError>;
}

// A loaded document. Metadata accessors report on the exact text that the
// analysis passes run against.
pub trait AnalyzedDocument: Send {
    fn set_language(&mut self, language: Language);

    fn language(&self) -> Option<Language>;

    fn word_count(&self) -> usize;

    fn sentence_count(&self) -> usize;

    fn ner(&self) -> Result<Vec<NamedEntity>, EngineError>;

    fn pos_tag(&self) -> Result<Vec<PosTag>, EngineError>;

    // Turns an NER pass into distinct entities, keeping only `types` (all
    // types when empty) and linking references when asked to.
    fn entities(
        &self,
        named_entities: &[NamedEntity],
        types: &[EntityType],
        resolve_references: bool,
    ) -> Result<Vec<Entity>, EngineError>;
}
