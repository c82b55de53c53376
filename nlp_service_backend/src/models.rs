// backend/src/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// --- Annotation Options ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "NER")]
    Ner,
    #[serde(rename = "POS")]
    Pos,
}

impl Operation {
    pub const ALL: [Operation; 2] = [Operation::Ner, Operation::Pos];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Ner => "NER",
            Operation::Pos => "POS",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    De,
    En,
    It,
    Fr,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::De, Language::En, Language::It, Language::Fr];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
            Language::It => "it",
            Language::Fr => "fr",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.as_str() == token)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Locations,
    Persons,
    Organisations,
}

impl EntityType {
    pub const ALL: [EntityType; 3] = [
        EntityType::Locations,
        EntityType::Persons,
        EntityType::Organisations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Locations => "locations",
            EntityType::Persons => "persons",
            EntityType::Organisations => "organisations",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.as_str() == token)
    }
}

// --- Job Requests ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Annotate,
    GetEntities,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Annotate => "annotate",
            JobKind::GetEntities => "get_entities",
        }
    }
}

// Fully resolved parameters. Frozen into the job payload at submission, so
// workers never consult configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationParams {
    pub operations: Vec<Operation>,
    pub language: Option<Language>,
    pub include_references: bool,
    pub entity_types: Vec<EntityType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRequest {
    pub kind: JobKind,
    pub text: String,
    pub params: AnnotationParams,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn generate() -> Self {
        JobId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        JobId(value)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPayload {
    pub id: JobId,
    pub kind: JobKind,
    pub text: String,
    pub params: AnnotationParams,
    pub submitted_at: DateTime<Utc>,
}

impl JobPayload {
    pub fn new(id: JobId, request: AnnotationRequest) -> Self {
        Self {
            id,
            kind: request.kind,
            text: request.text,
            params: request.params,
            submitted_at: Utc::now(),
        }
    }
}

// --- Job State (owned by the backend) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Pending,
    Progress,
    Success,
    Failure,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "PENDING",
            JobState::Progress => "PROGRESS",
            JobState::Success => "SUCCESS",
            JobState::Failure => "FAILURE",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Success | JobState::Failure)
    }
}

// Worker telemetry. Every field is optional on the wire; readers apply defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub current: Option<u32>,
    pub total: Option<u32>,
    pub message: Option<String>,
}

impl Progress {
    pub fn step(current: u32, total: u32, message: impl Into<String>) -> Self {
        Self {
            current: Some(current),
            total: Some(total),
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub kind: JobKind,
    pub state: JobState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<AnnotationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub worker_id: Option<String>,
}

impl JobRecord {
    pub fn pending(payload: &JobPayload) -> Self {
        Self {
            id: payload.id.clone(),
            kind: payload.kind,
            state: JobState::Pending,
            progress: None,
            result: None,
            error: None,
            submitted_at: payload.submitted_at,
            started_at: None,
            finished_at: None,
            worker_id: None,
        }
    }

    // Replaces the stored progress with a newer report. Reports that would
    // move `current` backwards, or arrive after the job finished, are dropped.
    // Returns whether the record changed.
    pub fn apply_progress(&mut self, worker_id: &str, progress: Progress) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        let stored = self.progress.as_ref().and_then(|p| p.current);
        if let (Some(stored), Some(next)) = (stored, progress.current) {
            if next < stored {
                return false;
            }
        }
        self.state = JobState::Progress;
        self.progress = Some(progress);
        self.started_at.get_or_insert_with(Utc::now);
        self.worker_id = Some(worker_id.to_string());
        true
    }

    pub fn apply_success(&mut self, result: AnnotationResult) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = JobState::Success;
        self.progress = None;
        self.result = Some(result);
        self.finished_at = Some(Utc::now());
        true
    }

    pub fn apply_failure(&mut self, error: String) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = JobState::Failure;
        self.progress = None;
        self.error = Some(error);
        self.finished_at = Some(Utc::now());
        true
    }
}

// --- Analysis Results ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub text: String,
    pub label: EntityType,
    /// Byte offsets into the analyzed text.
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartOfSpeech {
    #[serde(rename = "NOUN")]
    Noun,
    #[serde(rename = "PROPN")]
    ProperNoun,
    #[serde(rename = "VERB")]
    Verb,
    #[serde(rename = "AUX")]
    Auxiliary,
    #[serde(rename = "ADJ")]
    Adjective,
    #[serde(rename = "ADV")]
    Adverb,
    #[serde(rename = "PRON")]
    Pronoun,
    #[serde(rename = "DET")]
    Determiner,
    #[serde(rename = "ADP")]
    Adposition,
    #[serde(rename = "CCONJ")]
    Conjunction,
    #[serde(rename = "NUM")]
    Numeral,
    #[serde(rename = "PUNCT")]
    Punctuation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosTag {
    pub token: String,
    pub tag: PartOfSpeech,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub detected_language: Option<Language>,
    pub word_count: usize,
    pub sentence_count: usize,
}

// Final job output. Fields of operations that were not requested are left
// out of the JSON entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_entities: Option<Vec<NamedEntity>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech_tags: Option<Vec<PosTag>>,
    #[serde(
        rename = "entity_list",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub entities: Option<Vec<Entity>>,
    #[serde(flatten)]
    pub metadata: DocumentMetadata,
}

// --- API Payloads ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: String,
    pub task: JobId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatusView {
    pub state: JobState,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<AnnotationResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> JobPayload {
        JobPayload::new(
            JobId::generate(),
            AnnotationRequest {
                kind: JobKind::Annotate,
                text: "Angela Merkel besuchte gestern Rom.".to_string(),
                params: AnnotationParams {
                    operations: Operation::ALL.to_vec(),
                    language: None,
                    include_references: true,
                    entity_types: Vec::new(),
                },
            },
        )
    }

    fn empty_result() -> AnnotationResult {
        AnnotationResult {
            named_entities: None,
            part_of_speech_tags: None,
            entities: None,
            metadata: DocumentMetadata {
                detected_language: Some(Language::De),
                word_count: 5,
                sentence_count: 1,
            },
        }
    }

    #[test]
    fn tokens_parse_exactly() {
        assert_eq!(Operation::parse("NER"), Some(Operation::Ner));
        assert_eq!(Operation::parse("ner"), None);
        assert_eq!(Language::parse("fr"), Some(Language::Fr));
        assert_eq!(Language::parse("es"), None);
        assert_eq!(EntityType::parse("persons"), Some(EntityType::Persons));
        assert_eq!(EntityType::parse("people"), None);
    }

    #[test]
    fn progress_never_moves_backwards() {
        let mut record = JobRecord::pending(&payload());
        assert!(record.apply_progress("w1", Progress::step(2, 4, "NER")));
        assert!(!record.apply_progress("w1", Progress::step(1, 4, "late report")));
        assert_eq!(record.progress.as_ref().and_then(|p| p.current), Some(2));
        assert!(record.apply_progress("w1", Progress::step(2, 4, "still NER")));
        assert_eq!(record.state, JobState::Progress);
        assert!(record.started_at.is_some());
    }

    #[test]
    fn finished_jobs_are_sticky() {
        let mut record = JobRecord::pending(&payload());
        assert!(record.apply_success(empty_result()));
        assert!(!record.apply_progress("w1", Progress::step(9, 9, "late")));
        assert!(!record.apply_failure("boom".into()));
        assert_eq!(record.state, JobState::Success);
        assert!(record.progress.is_none());
        assert!(record.error.is_none());
    }

    #[test]
    fn result_omits_unrequested_fields() {
        let json = serde_json::to_value(empty_result()).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("named_entities"));
        assert!(!object.contains_key("part_of_speech_tags"));
        assert!(!object.contains_key("entity_list"));
        assert_eq!(object["detected_language"], "de");
        assert_eq!(object["word_count"], 5);
        assert_eq!(object["sentence_count"], 1);
    }

    #[test]
    fn record_survives_storage_round_trip() {
        let mut record = JobRecord::pending(&payload());
        record.apply_success(empty_result());
        let stored = serde_json::to_string(&record).unwrap();
        let loaded: JobRecord = serde_json::from_str(&stored).unwrap();
        assert_eq!(loaded, record);
    }
}
