// backend/src/engine/rule_based.rs

use regex::Regex;
use std::{collections::HashSet, sync::OnceLock};

use super::{
    lexicon::{self, GazetteerEntry},
    AnalysisEngine, AnalyzedDocument, EngineError,
};
use crate::models::{Entity, EntityType, Language, NamedEntity, PartOfSpeech, PosTag};

const TOKEN_PATTERN: &str = r"\w+(?:['’-]\w+)*|[^\w\s]";
const LONGEST_GAZETTEER_NAME: usize = 4;

/// Gazetteer and heuristics based analyzer for the supported languages.
pub struct RuleBasedEngine {
    token_pattern: Regex,
}

impl RuleBasedEngine {
    pub fn new() -> Self {
        Self {
            token_pattern: Regex::new(TOKEN_PATTERN).expect("token pattern is a valid regex"),
        }
    }
}

impl Default for RuleBasedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleBasedEngine {
    fn analyze(&self, text: &str) -> Result<RuleBasedDocument, EngineError> {
        let text = normalize(text);
        let tokens = segment(&self.token_pattern, &text);
        if !tokens.iter().any(|t| t.is_word) {
            return Err(EngineError::EmptyDocument);
        }
        let detected = detect_language(&tokens);
        Ok(RuleBasedDocument {
            text,
            tokens,
            detected,
            language_override: None,
            named: OnceLock::new(),
        })
    }
}

impl AnalysisEngine for RuleBasedEngine {
    fn load(&self, text: &str) -> Result<Box<dyn AnalyzedDocument>, EngineError> {
        Ok(Box::new(self.analyze(text)?))
    }
}

#[derive(Debug)]
struct Token {
    text: String,
    lower: String,
    start: usize,
    end: usize,
    sentence: usize,
    sentence_initial: bool,
    is_word: bool,
}

impl Token {
    fn is_capitalized(&self) -> bool {
        self.is_word && self.text.chars().next().is_some_and(char::is_uppercase)
    }
}

struct RuleBasedDocument {
    text: String,
    tokens: Vec<Token>,
    detected: Option<Language>,
    language_override: Option<Language>,
    // NER output, shared by the POS pass.
    named: OnceLock<Vec<NamedEntity>>,
}

/// Strips invisible characters that commonly leak in from copy and paste.
/// A soft hyphen in front of a capital letter joins two words and becomes a
/// space; anywhere else it is a hyphenation hint and is dropped.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\u{feff}' | '\u{200b}' => {}
            '\u{00ad}' => {
                if chars.peek().is_some_and(|next| next.is_uppercase())
                    && out.chars().next_back().is_some_and(char::is_alphanumeric)
                {
                    out.push(' ');
                }
            }
            _ => out.push(c),
        }
    }
    out.replace("\r\n", "\n").trim().to_string()
}

fn segment(pattern: &Regex, text: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut sentence = 0;
    let mut at_sentence_start = true;

    for m in pattern.find_iter(text) {
        let is_word = m.as_str().chars().any(char::is_alphanumeric);
        let token = Token {
            text: m.as_str().to_string(),
            lower: m.as_str().to_lowercase(),
            start: m.start(),
            end: m.end(),
            sentence,
            sentence_initial: is_word && at_sentence_start,
            is_word,
        };
        if is_word {
            at_sentence_start = false;
        }

        let after_abbreviation = token.text == "."
            && tokens
                .last()
                .is_some_and(|prev| lexicon::ABBREVIATIONS.contains(&prev.lower.as_str()));
        let ends_sentence =
            matches!(token.text.as_str(), "." | "!" | "?" | "…") && !after_abbreviation;

        tokens.push(token);
        if ends_sentence && !at_sentence_start {
            sentence += 1;
            at_sentence_start = true;
        }
    }
    tokens
}

fn detect_language(tokens: &[Token]) -> Option<Language> {
    let mut best = None;
    let mut best_score = 0;
    for language in Language::ALL {
        let stopwords = lexicon::stopwords(language);
        let score = tokens
            .iter()
            .filter(|t| t.is_word && stopwords.contains(&t.lower.as_str()))
            .count();
        if score > best_score {
            best = Some(language);
            best_score = score;
        }
    }
    best
}

fn is_function_word(word: &str) -> bool {
    Language::ALL.into_iter().any(|language| {
        lexicon::stopwords(language).contains(&word)
            || lexicon::closed_class(language).iter().any(|(w, _)| *w == word)
    })
}

fn lookup_gazetteer(name: &str) -> Option<&'static GazetteerEntry> {
    lexicon::GAZETTEER.iter().find(|entry| entry.name == name)
}

impl RuleBasedDocument {
    fn candidate_languages(&self) -> Vec<Language> {
        match self.language() {
            Some(language) => vec![language],
            None => Language::ALL.to_vec(),
        }
    }

    fn starts_name(&self, i: usize) -> bool {
        let token = &self.tokens[i];
        token.is_capitalized()
            && !lexicon::PERSON_TITLES.contains(&token.lower.as_str())
            && !(token.sentence_initial && is_function_word(&token.lower))
    }

    /// Exclusive end of the capitalized run starting at `start`. Name
    /// connectors are only kept when another capitalized word follows.
    fn run_end(&self, start: usize) -> usize {
        let sentence = self.tokens[start].sentence;
        let mut last_capitalized = start;
        let mut j = start + 1;
        while let Some(token) = self.tokens.get(j) {
            if token.sentence != sentence {
                break;
            }
            if token.is_capitalized() && !lexicon::PERSON_TITLES.contains(&token.lower.as_str()) {
                last_capitalized = j;
            } else if !(token.is_word && lexicon::NAME_CONNECTORS.contains(&token.lower.as_str())) {
                break;
            }
            j += 1;
        }
        last_capitalized + 1
    }

    fn span_text(&self, start: usize, end: usize) -> &str {
        &self.text[self.tokens[start].start..self.tokens[end - 1].end]
    }

    fn entity(&self, start: usize, end: usize, label: EntityType) -> NamedEntity {
        NamedEntity {
            text: self.span_text(start, end).to_string(),
            label,
            start: self.tokens[start].start,
            end: self.tokens[end - 1].end,
        }
    }

    fn gazetteer_match(&self, start: usize, limit: usize) -> Option<(usize, &'static GazetteerEntry)> {
        if !self.tokens[start].is_capitalized() {
            return None;
        }
        let longest = (limit - start).min(LONGEST_GAZETTEER_NAME);
        (1..=longest).rev().find_map(|len| {
            if !self.tokens[start + len - 1].is_capitalized() {
                return None;
            }
            let name = self.tokens[start..start + len]
                .iter()
                .map(|t| t.lower.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            lookup_gazetteer(&name).map(|entry| (len, entry))
        })
    }

    /// The word before `index`, skipping an abbreviation full stop.
    fn preceding_word(&self, index: usize) -> Option<&Token> {
        let mut i = index.checked_sub(1)?;
        if self.tokens[i].text == "." {
            i = i.checked_sub(1)?;
        }
        let token = &self.tokens[i];
        (token.is_word && token.sentence == self.tokens[index].sentence).then_some(token)
    }

    fn classify_run(&self, start: usize, end: usize, out: &mut Vec<NamedEntity>) {
        let has_org_marker = self.tokens[start..end]
            .iter()
            .any(|t| lexicon::ORGANISATION_MARKERS.contains(&t.lower.as_str()));
        if has_org_marker {
            out.push(self.entity(start, end, EntityType::Organisations));
            return;
        }

        let mut k = start;
        let mut unmatched_from = start;
        while k < end {
            match self.gazetteer_match(k, end) {
                Some((len, entry)) => {
                    self.classify_unknown(unmatched_from, k, out);
                    out.push(self.entity(k, k + len, entry.entity_type));
                    k += len;
                    unmatched_from = k;
                }
                None => k += 1,
            }
        }
        self.classify_unknown(unmatched_from, end, out);
    }

    fn classify_unknown(&self, mut start: usize, mut end: usize, out: &mut Vec<NamedEntity>) {
        while start < end && !self.tokens[start].is_capitalized() {
            start += 1;
        }
        while end > start && !self.tokens[end - 1].is_capitalized() {
            end -= 1;
        }
        if start == end {
            return;
        }

        if let Some(offset) = self.tokens[start..end]
            .iter()
            .position(|t| lexicon::GIVEN_NAMES.contains(&t.lower.as_str()))
        {
            out.push(self.entity(start + offset, end, EntityType::Persons));
            return;
        }

        let preceding = self.preceding_word(start).map(|t| t.lower.as_str());
        if preceding.is_some_and(|w| lexicon::PERSON_TITLES.contains(&w)) {
            out.push(self.entity(start, end, EntityType::Persons));
        } else if preceding.is_some_and(|w| lexicon::LOCATION_CUES.contains(&w)) {
            out.push(self.entity(start, end, EntityType::Locations));
        }
    }

    fn open_class_tag(&self, token: &Token) -> PartOfSpeech {
        let languages = self.candidate_languages();

        for language in &languages {
            if let Some((_, tag)) = lexicon::closed_class(*language)
                .iter()
                .find(|(w, _)| *w == token.lower)
            {
                return *tag;
            }
        }

        if token.is_capitalized() && !token.sentence_initial {
            return match self.language() {
                Some(Language::De) => PartOfSpeech::Noun,
                _ => PartOfSpeech::ProperNoun,
            };
        }

        let length = token.lower.chars().count();
        for language in &languages {
            let rule = lexicon::suffix_rules(*language).iter().find(|(suffix, _)| {
                token.lower.ends_with(suffix) && length > suffix.chars().count() + 2
            });
            if let Some((_, tag)) = rule {
                return *tag;
            }
        }
        PartOfSpeech::Noun
    }
}

impl RuleBasedDocument {
    fn named_entities(&self) -> &[NamedEntity] {
        self.named.get_or_init(|| {
            let mut entities = Vec::new();
            let mut i = 0;
            while i < self.tokens.len() {
                if !self.starts_name(i) {
                    i += 1;
                    continue;
                }
                let end = self.run_end(i);
                self.classify_run(i, end, &mut entities);
                i = end;
            }
            entities
        })
    }
}

impl AnalyzedDocument for RuleBasedDocument {
    fn set_language(&mut self, language: Language) {
        self.language_override = Some(language);
        self.named.take();
    }

    fn language(&self) -> Option<Language> {
        self.language_override.or(self.detected)
    }

    fn word_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_word).count()
    }

    fn sentence_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.sentence_initial).count()
    }

    fn ner(&self) -> Result<Vec<NamedEntity>, EngineError> {
        Ok(self.named_entities().to_vec())
    }

    fn pos_tag(&self) -> Result<Vec<PosTag>, EngineError> {
        let named = self.named_entities();
        let in_name = |token: &Token| {
            named
                .iter()
                .any(|e| token.start >= e.start && token.end <= e.end)
        };

        let tags = self
            .tokens
            .iter()
            .map(|token| {
                let tag = if !token.is_word {
                    PartOfSpeech::Punctuation
                } else if token.text.chars().all(char::is_numeric) {
                    PartOfSpeech::Numeral
                } else if token.is_capitalized() && in_name(token) {
                    PartOfSpeech::ProperNoun
                } else {
                    self.open_class_tag(token)
                };
                PosTag {
                    token: token.text.clone(),
                    tag,
                }
            })
            .collect();
        Ok(tags)
    }

    fn entities(
        &self,
        named_entities: &[NamedEntity],
        types: &[EntityType],
        resolve_references: bool,
    ) -> Result<Vec<Entity>, EngineError> {
        let mut seen = HashSet::new();
        let mut entities = Vec::new();
        for named in named_entities {
            if !types.is_empty() && !types.contains(&named.label) {
                continue;
            }
            let key = named.text.to_lowercase();
            if !seen.insert((named.label, key.clone())) {
                continue;
            }
            let reference = if resolve_references {
                let key = key.split_whitespace().collect::<Vec<_>>().join(" ");
                lookup_gazetteer(&key)
                    .filter(|entry| entry.entity_type == named.label)
                    .map(lexicon::reference_url)
            } else {
                None
            };
            entities.push(Entity {
                entity_type: named.label,
                name: named.text.clone(),
                reference,
            });
        }
        Ok(entities)
    }
}
