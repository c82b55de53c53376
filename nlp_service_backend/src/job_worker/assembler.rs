// backend/src/job_worker/assembler.rs

use crate::{
    engine::AnalyzedDocument,
    models::{AnnotationResult, DocumentMetadata, Entity, NamedEntity, PosTag},
};

/// Raw output of the passes a job asked for. Passes that did not run stay `None`.
#[derive(Debug, Default)]
pub struct OperationOutputs {
    pub named_entities: Option<Vec<NamedEntity>>,
    pub part_of_speech_tags: Option<Vec<PosTag>>,
    pub entities: Option<Vec<Entity>>,
}

/// Metadata is read from the same document the passes ran on.
pub fn assemble(outputs: OperationOutputs, document: &dyn AnalyzedDocument) -> AnnotationResult {
    AnnotationResult {
        named_entities: outputs.named_entities,
        part_of_speech_tags: outputs.part_of_speech_tags,
        entities: outputs.entities,
        metadata: DocumentMetadata {
            detected_language: document.language(),
            word_count: document.word_count(),
            sentence_count: document.sentence_count(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::{AnalysisEngine, RuleBasedEngine},
        models::Language,
    };

    #[test]
    fn metadata_always_present() {
        let mut document = RuleBasedEngine::new()
            .load("Marie Curie arbeitete in Paris. Sie war sehr erfolgreich.")
            .unwrap();
        document.set_language(Language::De);

        let result = assemble(OperationOutputs::default(), document.as_ref());
        assert_eq!(result.metadata.detected_language, Some(Language::De));
        assert_eq!(result.metadata.word_count, 9);
        assert_eq!(result.metadata.sentence_count, 2);
        assert!(result.named_entities.is_none());
        assert!(result.part_of_speech_tags.is_none());
        assert!(result.entities.is_none());
    }

    #[test]
    fn only_requested_fields_are_serialized() {
        let document = RuleBasedEngine::new()
            .load("Albert Einstein lectured at the University of Berlin.")
            .unwrap();
        let outputs = OperationOutputs {
            named_entities: Some(document.ner().unwrap()),
            ..Default::default()
        };

        let json = serde_json::to_value(assemble(outputs, document.as_ref())).unwrap();
        let object = json.as_object().unwrap();
        assert!(object.contains_key("named_entities"));
        assert!(!object.contains_key("part_of_speech_tags"));
        assert!(!object.contains_key("entity_list"));
        assert_eq!(object["detected_language"], "en");
    }
}
