// backend/src/engine/lexicon.rs

//! Word lists backing the rule-based engine. All entries are lowercase.

use crate::models::{EntityType, Language, PartOfSpeech};

pub(super) struct GazetteerEntry {
    pub name: &'static str,
    pub entity_type: EntityType,
    pub reference: &'static str,
}

const fn place(name: &'static str, reference: &'static str) -> GazetteerEntry {
    GazetteerEntry {
        name,
        entity_type: EntityType::Locations,
        reference,
    }
}

const fn person(name: &'static str, reference: &'static str) -> GazetteerEntry {
    GazetteerEntry {
        name,
        entity_type: EntityType::Persons,
        reference,
    }
}

const fn org(name: &'static str, reference: &'static str) -> GazetteerEntry {
    GazetteerEntry {
        name,
        entity_type: EntityType::Organisations,
        reference,
    }
}

const WIKIDATA: &str = "https://www.wikidata.org/wiki/";

pub(super) fn reference_url(entry: &GazetteerEntry) -> String {
    format!("{}{}", WIKIDATA, entry.reference)
}

pub(super) const GAZETTEER: &[GazetteerEntry] = &[
    place("berlin", "Q64"),
    place("rom", "Q220"),
    place("rome", "Q220"),
    place("roma", "Q220"),
    place("paris", "Q90"),
    place("parigi", "Q90"),
    place("london", "Q84"),
    place("londres", "Q84"),
    place("londra", "Q84"),
    place("athen", "Q1524"),
    place("athens", "Q1524"),
    place("atene", "Q1524"),
    place("athènes", "Q1524"),
    place("münchen", "Q1726"),
    place("munich", "Q1726"),
    place("monaco di baviera", "Q1726"),
    place("hamburg", "Q1055"),
    place("wien", "Q1741"),
    place("vienna", "Q1741"),
    place("vienne", "Q1741"),
    place("prag", "Q1085"),
    place("prague", "Q1085"),
    place("mailand", "Q490"),
    place("milan", "Q490"),
    place("milano", "Q490"),
    place("florenz", "Q2044"),
    place("florence", "Q2044"),
    place("firenze", "Q2044"),
    place("venedig", "Q641"),
    place("venice", "Q641"),
    place("venezia", "Q641"),
    place("neapel", "Q2634"),
    place("naples", "Q2634"),
    place("napoli", "Q2634"),
    place("deutschland", "Q183"),
    place("germany", "Q183"),
    place("germania", "Q183"),
    place("allemagne", "Q183"),
    place("italien", "Q38"),
    place("italy", "Q38"),
    place("italia", "Q38"),
    place("italie", "Q38"),
    place("frankreich", "Q142"),
    place("france", "Q142"),
    place("francia", "Q142"),
    place("griechenland", "Q41"),
    place("greece", "Q41"),
    place("grecia", "Q41"),
    place("grèce", "Q41"),
    person("angela merkel", "Q567"),
    person("albert einstein", "Q937"),
    person("marie curie", "Q7186"),
    person("napoleon", "Q517"),
    person("napoléon", "Q517"),
    person("leonardo da vinci", "Q762"),
    person("dante alighieri", "Q1067"),
    person("johann wolfgang von goethe", "Q5879"),
    person("goethe", "Q5879"),
    person("johann sebastian bach", "Q1339"),
    org("unesco", "Q7809"),
    org("google", "Q95"),
    org("vereinte nationen", "Q1065"),
    org("united nations", "Q1065"),
    org("nazioni unite", "Q1065"),
    org("nations unies", "Q1065"),
    org("europäische union", "Q458"),
    org("european union", "Q458"),
    org("unione europea", "Q458"),
    org("union européenne", "Q458"),
];

pub(super) const GIVEN_NAMES: &[&str] = &[
    "albert", "angela", "anna", "friedrich", "giovanni", "giuseppe", "heinrich", "jacques",
    "james", "jean", "johann", "john", "karl", "luca", "marco", "maria", "marie", "mary",
    "peter", "pierre", "sophie", "thomas", "wolfgang",
];

pub(super) const PERSON_TITLES: &[&str] = &[
    "dr", "frau", "herr", "madame", "monsieur", "mr", "mrs", "ms", "prof", "professor",
    "signor", "signora", "sir",
];

/// Any of these inside a capitalized run marks it as an organisation.
pub(super) const ORGANISATION_MARKERS: &[&str] = &[
    "academy", "accademia", "académie", "ag", "akademie", "bank", "corp", "gmbh", "inc",
    "institut", "institute", "istituto", "ltd", "ministerium", "ministero", "ministry",
    "ministère", "museo", "museum", "musée", "universität", "università", "université",
    "university",
];

/// Lowercase words that commonly precede a place name.
pub(super) const LOCATION_CUES: &[&str] = &[
    "à", "aus", "dans", "en", "from", "im", "in", "nach", "near", "verso",
];

/// Lowercase particles allowed inside a multi-word name.
pub(super) const NAME_CONNECTORS: &[&str] = &[
    "da", "de", "del", "der", "di", "du", "of", "van", "von",
];

/// Tokens after which a full stop does not end the sentence.
pub(super) const ABBREVIATIONS: &[&str] = &[
    "b", "bzw", "ca", "dr", "etc", "mr", "mrs", "ms", "nr", "prof", "st", "vgl", "z",
];

pub(super) fn stopwords(language: Language) -> &'static [&'static str] {
    match language {
        Language::De => &[
            "aber", "als", "am", "auch", "auf", "aus", "bei", "das", "dem", "den", "der", "des",
            "die", "ein", "eine", "einer", "eines", "er", "es", "für", "gestern", "haben", "hat",
            "heute", "ich", "im", "ist", "mit", "nach", "nicht", "noch", "nur", "oder", "sich",
            "sie", "sind", "über", "und", "von", "war", "wie", "wir", "wird", "wurde", "zu",
        ],
        Language::En => &[
            "also", "and", "are", "as", "at", "be", "been", "but", "by", "for", "from", "had",
            "has", "have", "he", "is", "it", "not", "of", "on", "or", "she", "that", "the",
            "they", "this", "to", "was", "we", "were", "which", "with", "yesterday",
        ],
        Language::It => &[
            "al", "alla", "anche", "che", "come", "con", "da", "dei", "del", "della", "delle",
            "di", "è", "gli", "ha", "ieri", "il", "lo", "ma", "nel", "nella", "non", "per", "più",
            "sono", "una", "uno",
        ],
        Language::Fr => &[
            "au", "aux", "avec", "ce", "cette", "dans", "des", "du", "elle", "est", "été", "hier",
            "il", "les", "mais", "ne", "nous", "pas", "par", "plus", "pour", "qui", "sont",
            "sur", "une",
        ],
    }
}

pub(super) fn closed_class(language: Language) -> &'static [(&'static str, PartOfSpeech)] {
    use PartOfSpeech::*;
    match language {
        Language::De => &[
            ("der", Determiner), ("die", Determiner), ("das", Determiner), ("dem", Determiner),
            ("den", Determiner), ("des", Determiner), ("ein", Determiner), ("eine", Determiner),
            ("einer", Determiner), ("einem", Determiner), ("einen", Determiner),
            ("eines", Determiner), ("und", Conjunction), ("oder", Conjunction),
            ("aber", Conjunction), ("in", Adposition), ("im", Adposition), ("mit", Adposition),
            ("von", Adposition), ("vom", Adposition), ("zu", Adposition), ("zum", Adposition),
            ("auf", Adposition), ("für", Adposition), ("bei", Adposition), ("aus", Adposition),
            ("nach", Adposition), ("über", Adposition), ("am", Adposition), ("ich", Pronoun),
            ("du", Pronoun), ("er", Pronoun), ("sie", Pronoun), ("es", Pronoun),
            ("wir", Pronoun), ("ihr", Pronoun), ("sich", Pronoun), ("ist", Auxiliary),
            ("sind", Auxiliary), ("war", Auxiliary), ("wird", Auxiliary), ("wurde", Auxiliary),
            ("werden", Auxiliary), ("hat", Auxiliary), ("haben", Auxiliary), ("nicht", Adverb),
            ("auch", Adverb), ("noch", Adverb), ("nur", Adverb), ("sehr", Adverb),
            ("gestern", Adverb), ("heute", Adverb),
        ],
        Language::En => &[
            ("the", Determiner), ("a", Determiner), ("an", Determiner), ("this", Determiner),
            ("that", Determiner), ("these", Determiner), ("those", Determiner),
            ("and", Conjunction), ("or", Conjunction), ("but", Conjunction), ("of", Adposition),
            ("to", Adposition), ("in", Adposition), ("on", Adposition), ("for", Adposition),
            ("with", Adposition), ("at", Adposition), ("by", Adposition), ("from", Adposition),
            ("into", Adposition), ("about", Adposition), ("i", Pronoun), ("you", Pronoun),
            ("he", Pronoun), ("she", Pronoun), ("it", Pronoun), ("we", Pronoun),
            ("they", Pronoun), ("him", Pronoun), ("her", Pronoun), ("them", Pronoun),
            ("is", Auxiliary), ("are", Auxiliary), ("was", Auxiliary), ("were", Auxiliary),
            ("be", Auxiliary), ("been", Auxiliary), ("has", Auxiliary), ("have", Auxiliary),
            ("had", Auxiliary), ("will", Auxiliary), ("would", Auxiliary), ("can", Auxiliary),
            ("not", Adverb), ("also", Adverb), ("very", Adverb), ("yesterday", Adverb),
            ("today", Adverb),
        ],
        Language::It => &[
            ("il", Determiner), ("lo", Determiner), ("la", Determiner), ("i", Determiner),
            ("gli", Determiner), ("le", Determiner), ("un", Determiner), ("una", Determiner),
            ("uno", Determiner), ("e", Conjunction), ("o", Conjunction), ("ma", Conjunction),
            ("di", Adposition), ("a", Adposition), ("da", Adposition), ("in", Adposition),
            ("con", Adposition), ("su", Adposition), ("per", Adposition), ("tra", Adposition),
            ("fra", Adposition), ("del", Adposition), ("della", Adposition), ("nel", Adposition),
            ("nella", Adposition), ("al", Adposition), ("alla", Adposition), ("io", Pronoun),
            ("tu", Pronoun), ("lui", Pronoun), ("lei", Pronoun), ("noi", Pronoun),
            ("voi", Pronoun), ("loro", Pronoun), ("è", Auxiliary), ("sono", Auxiliary),
            ("era", Auxiliary), ("ha", Auxiliary), ("hanno", Auxiliary), ("ho", Auxiliary),
            ("non", Adverb), ("anche", Adverb), ("molto", Adverb), ("ieri", Adverb),
            ("oggi", Adverb),
        ],
        Language::Fr => &[
            ("le", Determiner), ("la", Determiner), ("les", Determiner), ("un", Determiner),
            ("une", Determiner), ("des", Determiner), ("du", Determiner), ("ce", Determiner),
            ("cette", Determiner), ("et", Conjunction), ("ou", Conjunction),
            ("mais", Conjunction), ("de", Adposition), ("à", Adposition), ("dans", Adposition),
            ("en", Adposition), ("sur", Adposition), ("pour", Adposition), ("avec", Adposition),
            ("par", Adposition), ("au", Adposition), ("aux", Adposition), ("je", Pronoun),
            ("tu", Pronoun), ("il", Pronoun), ("elle", Pronoun), ("nous", Pronoun),
            ("vous", Pronoun), ("ils", Pronoun), ("elles", Pronoun), ("est", Auxiliary),
            ("sont", Auxiliary), ("était", Auxiliary), ("a", Auxiliary), ("ont", Auxiliary),
            ("été", Auxiliary), ("ne", Adverb), ("pas", Adverb), ("aussi", Adverb),
            ("très", Adverb), ("hier", Adverb),
        ],
    }
}

/// Suffix rules for open-class words, checked in order.
pub(super) fn suffix_rules(language: Language) -> &'static [(&'static str, PartOfSpeech)] {
    use PartOfSpeech::*;
    match language {
        Language::De => &[
            ("lich", Adjective), ("isch", Adjective), ("ig", Adjective), ("bar", Adjective),
            ("ten", Verb), ("te", Verb), ("en", Verb), ("st", Verb), ("t", Verb),
        ],
        Language::En => &[
            ("ly", Adverb), ("ing", Verb), ("ed", Verb), ("ous", Adjective), ("ful", Adjective),
            ("ive", Adjective), ("able", Adjective), ("ic", Adjective), ("al", Adjective),
        ],
        Language::It => &[
            ("mente", Adverb), ("are", Verb), ("ere", Verb), ("ire", Verb), ("ato", Verb),
            ("ata", Verb), ("ito", Verb), ("oso", Adjective), ("osa", Adjective),
            ("ale", Adjective), ("ile", Adjective),
        ],
        Language::Fr => &[
            ("ment", Adverb), ("er", Verb), ("ir", Verb), ("ait", Verb), ("ée", Verb),
            ("é", Verb), ("eux", Adjective), ("euse", Adjective), ("able", Adjective),
            ("ique", Adjective),
        ],
    }
}
