// backend/src/validation/mod.rs

use crate::{
    config::{RequestDefaults, ServiceConfig},
    error::ValidationError,
    models::{AnnotationParams, AnnotationRequest, EntityType, JobKind, Language, Operation},
};

pub const MIN_TEXT_LENGTH: usize = 30;

/// Request arguments exactly as the client sent them.
#[derive(Debug, Clone, Default)]
pub struct RawArgs {
    pub text: String,
    pub operation: Option<String>,
    pub entity_type: Option<String>,
    pub lang: Option<String>,
    pub include_references: Option<String>,
}

/// Recognises the boolean vocabulary accepted on query strings.
pub fn parse_flag(token: &str) -> Option<bool> {
    match token.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct ParamValidator {
    supported_languages: Vec<Language>,
    defaults: RequestDefaults,
}

impl ParamValidator {
    pub fn new(supported_languages: Vec<Language>, defaults: RequestDefaults) -> Self {
        Self {
            supported_languages,
            defaults,
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.supported_languages.clone(), config.defaults)
    }

    pub fn supported_languages(&self) -> &[Language] {
        &self.supported_languages
    }

    pub fn validate(&self, kind: JobKind, raw: RawArgs) -> Result<AnnotationRequest, ValidationError> {
        let length = raw.text.chars().count();
        if length < MIN_TEXT_LENGTH {
            return Err(ValidationError::InputTooShort {
                length,
                minimum: MIN_TEXT_LENGTH,
            });
        }

        let language = self.resolve_language(raw.lang.as_deref())?;
        let include_references = raw
            .include_references
            .as_deref()
            .and_then(parse_flag)
            .unwrap_or(self.defaults.include_references);

        let (operations, entity_types) = match kind {
            JobKind::Annotate => (resolve_operations(raw.operation.as_deref())?, Vec::new()),
            JobKind::GetEntities => (Vec::new(), resolve_entity_types(raw.entity_type.as_deref())?),
        };

        Ok(AnnotationRequest {
            kind,
            text: raw.text,
            params: AnnotationParams {
                operations,
                language,
                include_references,
                entity_types,
            },
        })
    }

    fn resolve_language(&self, token: Option<&str>) -> Result<Option<Language>, ValidationError> {
        let Some(token) = token else {
            return Ok(None);
        };
        Language::parse(token)
            .filter(|lang| self.supported_languages.contains(lang))
            .map(Some)
            .ok_or_else(|| ValidationError::UnsupportedLanguage(token.to_string()))
    }
}

fn resolve_operations(token: Option<&str>) -> Result<Vec<Operation>, ValidationError> {
    let token = token.unwrap_or_default();
    if token == "all" {
        return Ok(Operation::ALL.to_vec());
    }
    Operation::parse(token)
        .map(|op| vec![op])
        .ok_or_else(|| ValidationError::UnknownOperation(token.to_string()))
}

fn resolve_entity_types(token: Option<&str>) -> Result<Vec<EntityType>, ValidationError> {
    match token {
        None | Some("") => Ok(Vec::new()),
        Some(token) => EntityType::parse(token)
            .map(|ty| vec![ty])
            .ok_or_else(|| ValidationError::UnsupportedEntityType(token.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Angela Merkel traf gestern in Berlin den Präsidenten.";

    fn validator() -> ParamValidator {
        ParamValidator::new(Language::ALL.to_vec(), RequestDefaults::default())
    }

    fn annotate(operation: &str) -> RawArgs {
        RawArgs {
            text: TEXT.to_string(),
            operation: Some(operation.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn short_input_rejected_first() {
        let raw = RawArgs {
            text: "too short".into(),
            operation: Some("bogus".into()),
            lang: Some("xx".into()),
            ..Default::default()
        };
        assert_eq!(
            validator().validate(JobKind::Annotate, raw),
            Err(ValidationError::InputTooShort {
                length: 9,
                minimum: MIN_TEXT_LENGTH
            })
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 30 characters, more than 30 bytes
        let raw = RawArgs {
            text: "äöüäöüäöüäöüäöüäöüäöüäöüäöüäöü".into(),
            operation: Some("NER".into()),
            ..Default::default()
        };
        assert!(validator().validate(JobKind::Annotate, raw).is_ok());
    }

    #[test]
    fn all_expands_in_fixed_order() {
        let request = validator().validate(JobKind::Annotate, annotate("all")).unwrap();
        assert_eq!(request.params.operations, vec![Operation::Ner, Operation::Pos]);
        let request = validator().validate(JobKind::Annotate, annotate("POS")).unwrap();
        assert_eq!(request.params.operations, vec![Operation::Pos]);
    }

    #[test]
    fn unknown_operation() {
        assert_eq!(
            validator().validate(JobKind::Annotate, annotate("SENTIMENT")),
            Err(ValidationError::UnknownOperation("SENTIMENT".into()))
        );
    }

    #[test]
    fn language_must_be_supported() {
        let mut raw = annotate("NER");
        raw.lang = Some("es".into());
        assert_eq!(
            validator().validate(JobKind::Annotate, raw),
            Err(ValidationError::UnsupportedLanguage("es".into()))
        );

        let restricted = ParamValidator::new(vec![Language::En], RequestDefaults::default());
        let mut raw = annotate("NER");
        raw.lang = Some("de".into());
        assert!(restricted.validate(JobKind::Annotate, raw).is_err());

        let mut raw = annotate("NER");
        raw.lang = Some("it".into());
        let request = validator().validate(JobKind::Annotate, raw).unwrap();
        assert_eq!(request.params.language, Some(Language::It));
    }

    #[test]
    fn flags_are_lenient() {
        let cases = [
            ("TRUE", true),
            ("yes", true),
            ("0", false),
            ("Off", false),
            ("banana", true),
        ];
        for (token, expected) in cases {
            let mut raw = annotate("NER");
            raw.include_references = Some(token.into());
            let request = validator().validate(JobKind::Annotate, raw).unwrap();
            assert_eq!(request.params.include_references, expected, "token {token}");
        }

        let omitted = validator().validate(JobKind::Annotate, annotate("NER")).unwrap();
        let mut raw = annotate("NER");
        raw.include_references = Some("banana".into());
        let banana = validator().validate(JobKind::Annotate, raw).unwrap();
        assert_eq!(omitted, banana);
    }

    #[test]
    fn configured_default_is_used_for_unknown_tokens() {
        let validator = ParamValidator::new(
            Language::ALL.to_vec(),
            RequestDefaults {
                include_references: false,
            },
        );
        let mut raw = annotate("NER");
        raw.include_references = Some("maybe".into());
        let request = validator.validate(JobKind::Annotate, raw).unwrap();
        assert!(!request.params.include_references);
    }

    #[test]
    fn entity_type_normalisation() {
        let entities = |entity_type: Option<&str>| RawArgs {
            text: TEXT.to_string(),
            entity_type: entity_type.map(str::to_string),
            ..Default::default()
        };

        let absent = validator().validate(JobKind::GetEntities, entities(None)).unwrap();
        let empty = validator().validate(JobKind::GetEntities, entities(Some(""))).unwrap();
        assert!(absent.params.entity_types.is_empty());
        assert_eq!(absent, empty);
        assert!(absent.params.operations.is_empty());

        let persons = validator()
            .validate(JobKind::GetEntities, entities(Some("persons")))
            .unwrap();
        assert_eq!(persons.params.entity_types, vec![EntityType::Persons]);

        assert_eq!(
            validator().validate(JobKind::GetEntities, entities(Some("planets"))),
            Err(ValidationError::UnsupportedEntityType("planets".into()))
        );
    }
}
