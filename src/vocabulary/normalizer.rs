//! Turns free-form model output for "define word X" into a [`VocabularyEntry`].
//!
//! Layers, tried in order, each a pure function:
//! 1. [`parse_structured`]: first balanced `{...}` region parsed as a JSON object.
//! 2. Field repair on that object (`Missing <field>` / "not available" fillers).
//! 3. [`normalize_definition`]: bare strings gain a glossary-based Burmese gloss.
//! 4. [`normalize_examples`]: alias keys, string items, pad/truncate to three.
//! 5. When 1 yields nothing, `extract_*` passes mine the raw text instead.
//!
//! Nothing here fails; every miss degrades to a deterministic default.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

use super::dto::{
    Definition, Example, PartOfSpeech, VocabularyEntry, EXAMPLE_COUNT, NO_DEFINITION,
    NO_TRANSLATION,
};

/// English fragment to Burmese, longest key first so that e.g. "adverb" wins over "verb".
const GLOSSARY: &[(&str, &str)] = &[
    ("adjective", "နာမဝိသေသန"),
    ("something", "တစ်စုံတစ်ရာ"),
    ("someone", "တစ်စုံတစ်ယောက်"),
    ("used to", "အသုံးပြုသည်"),
    ("quality", "အရည်အသွေး"),
    ("feeling", "ခံစားချက်"),
    ("adverb", "ကြိယာဝိသေသန"),
    ("action", "လုပ်ဆောင်ချက်"),
    ("object", "အရာဝတ္ထု"),
    ("person", "လူ"),
    ("state", "အခြေအနေ"),
    ("thing", "အရာ"),
    ("place", "နေရာ"),
    ("noun", "နာမ်"),
    ("verb", "ကြိယာ"),
    ("time", "အချိန်"),
    ("way", "နည်းလမ်း"),
];

const GLOSS_SUFFIX: &str = " ဟု အဓိပ္ပာယ်ရသည်";

const MIN_EXAMPLE_CHARS: usize = 10;

lazy_static! {
    static ref BURMESE_PATTERNS: Vec<Regex> = compile(&[
        r#"(?i)"burmese"\s*:\s*"([^"]+)""#,
        r"(?i)burmese[:\s]+([^\n]+)",
        r"မြန်မာ[:\s]+([^\n]+)",
    ]);
    static ref POS_PATTERNS: Vec<Regex> = compile(&[
        r#"(?i)"part_of_speech"\s*:\s*"([^"]+)""#,
        r"(?i)part of speech[:\s]+(\w+)",
        r"(?i)\b(noun|verb|adjective|adverb|preposition|conjunction|interjection)\b",
    ]);
    static ref DEFINITION_PATTERNS: Vec<Regex> = compile(&[
        r#"(?i)"definition"\s*:\s*"([^"]+)""#,
        r#"(?i)"english"\s*:\s*"([^"]+)""#,
        r"(?i)definition[:\s]+([^\n]+)",
        r"(?i)means?[:\s]+([^\n.]+)",
    ]);
    static ref EXAMPLE_LINE_PATTERNS: Vec<Regex> = compile(&[
        r"(?m)^[ \t]*\d+[.)][ \t]*(.+)$",
        r"(?m)^[ \t]*[•\-*][ \t]+(.+)$",
        r"(?im)^[ \t]*example[ \t]*\d*[ \t]*[:.)\-][ \t]*(.+)$",
    ]);
    static ref EXAMPLES_ARRAY: Regex = Regex::new(r#"(?s)"examples"\s*:\s*\[(.*?)\]"#).unwrap();
    static ref EXAMPLE_OBJECT: Regex = Regex::new(r"(?s)\{(.*?)\}").unwrap();
    static ref EXAMPLE_ENGLISH: Regex = Regex::new(r#""english"\s*:\s*"([^"]+)""#).unwrap();
    static ref EXAMPLE_BURMESE: Regex =
        Regex::new(r#""burmese_translation"\s*:\s*"([^"]+)""#).unwrap();
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

/// Normalizes raw model output for `word`. Pure and total.
pub fn normalize(raw_text: &str, word: &str) -> VocabularyEntry {
    match parse_structured(raw_text) {
        Some(obj) => from_object(&obj, word),
        None => from_free_text(raw_text, word),
    }
}

// ---- layer 1: structured extraction ----

/// First balanced brace region; braces inside JSON string literals are ignored.
pub fn balanced_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Outermost first-`{` to last-`}` span; catches objects whose string escapes confuse the scanner.
fn outer_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

pub fn parse_structured(text: &str) -> Option<Map<String, Value>> {
    [balanced_object_span(text), outer_object_span(text)]
        .into_iter()
        .flatten()
        .find_map(|span| match serde_json::from_str::<Value>(span) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        })
}

// ---- layer 2: field repair ----

fn from_object(obj: &Map<String, Value>, word: &str) -> VocabularyEntry {
    let definition = match present(obj, "definition") {
        Some(v) => normalize_definition(v, word),
        None => Definition::not_available(),
    };
    let examples = match present(obj, "examples") {
        Some(Value::Array(items)) => normalize_examples(items, word),
        _ => normalize_examples(&[], word),
    };
    VocabularyEntry {
        word: scalar_or_missing(obj, "word"),
        part_of_speech: PartOfSpeech::from(scalar_or_missing(obj, "part_of_speech")),
        burmese: scalar_or_missing(obj, "burmese"),
        definition,
        examples,
    }
}

fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn scalar_or_missing(obj: &Map<String, Value>, key: &str) -> String {
    present(obj, key)
        .map(value_text)
        .unwrap_or_else(|| format!("Missing {key}"))
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Text under `key` whenever the key is present, even if empty.
fn key_text(map: &Map<String, Value>, key: &str) -> Option<String> {
    present(map, key).map(value_text)
}

/// Text of the first key holding a non-empty value.
fn first_text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| present(map, k))
        .map(value_text)
        .find(|s| !s.trim().is_empty())
}

// ---- layer 3: definition ----

pub fn normalize_definition(value: &Value, word: &str) -> Definition {
    match value {
        Value::Object(map) => {
            match (key_text(map, "english"), key_text(map, "burmese")) {
                (Some(english), Some(burmese)) => Definition { english, burmese },
                (Some(english), None) => Definition {
                    burmese: heuristic_burmese(&english),
                    english,
                },
                (None, Some(burmese)) => Definition {
                    english: first_text(map, &["definition"])
                        .unwrap_or_else(|| format!("Definition of {word}")),
                    burmese,
                },
                (None, None) => {
                    let english =
                        first_text(map, &["definition"]).unwrap_or_else(|| value.to_string());
                    Definition {
                        burmese: heuristic_burmese(&english),
                        english,
                    }
                }
            }
        }
        Value::String(s) => Definition {
            english: s.clone(),
            burmese: heuristic_burmese(s),
        },
        _ => Definition::for_word(word),
    }
}

/// Best-effort gloss: glossary substitution plus a fixed suffix. Never empty.
pub fn heuristic_burmese(english: &str) -> String {
    let mut out = english.to_string();
    for (en, my) in GLOSSARY {
        if out.contains(en) {
            out = out.replace(en, my);
        }
    }
    out.push_str(GLOSS_SUFFIX);
    out
}

// ---- layer 4: examples ----

pub fn normalize_examples(items: &[Value], word: &str) -> [Example; EXAMPLE_COUNT] {
    let mut coerced = items.iter().filter_map(|item| coerce_example(item, word));
    std::array::from_fn(|i| {
        coerced
            .next()
            .unwrap_or_else(|| Example::placeholder(word, i + 1))
    })
}

fn coerce_example(item: &Value, word: &str) -> Option<Example> {
    match item {
        Value::String(s) => Some(Example {
            english: s.clone(),
            burmese_translation: format!("ဤဝါကျကို {word} စကားလုံးဖြင့် ဖွဲ့စည်းထားပါသည်"),
        }),
        Value::Object(map) => Some(Example {
            english: key_text(map, "english")
                .or_else(|| first_text(map, &["sentence", "example"]))
                .unwrap_or_else(|| item.to_string()),
            burmese_translation: key_text(map, "burmese_translation")
                .or_else(|| first_text(map, &["burmese", "translation"]))
                .unwrap_or_else(|| format!("{word} စကားလုံးပါဝင်သော ဝါကျ")),
        }),
        _ => None,
    }
}

// ---- layer 5: free-text mining ----

fn from_free_text(raw_text: &str, word: &str) -> VocabularyEntry {
    let definition_text =
        extract_definition(raw_text).unwrap_or_else(|| NO_DEFINITION.to_string());
    VocabularyEntry {
        word: word.to_string(),
        part_of_speech: extract_part_of_speech(raw_text)
            .map(PartOfSpeech::from)
            .unwrap_or(PartOfSpeech::Unknown),
        burmese: extract_burmese(raw_text).unwrap_or_else(|| NO_TRANSLATION.to_string()),
        definition: normalize_definition(&Value::String(definition_text), word),
        examples: normalize_examples(&extract_examples(raw_text), word),
    }
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

pub fn extract_burmese(text: &str) -> Option<String> {
    first_capture(&BURMESE_PATTERNS, text)
}

pub fn extract_part_of_speech(text: &str) -> Option<String> {
    first_capture(&POS_PATTERNS, text).map(|s| s.to_lowercase())
}

pub fn extract_definition(text: &str) -> Option<String> {
    first_capture(&DEFINITION_PATTERNS, text)
}

/// Example candidates: objects from an `"examples": [...]` fragment when present,
/// otherwise numbered, bulleted or `Example:` lines.
pub fn extract_examples(text: &str) -> Vec<Value> {
    let from_json: Vec<Value> = EXAMPLES_ARRAY
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|body| {
            EXAMPLE_OBJECT
                .captures_iter(body.as_str())
                .filter_map(|obj| {
                    let inner = obj.get(1)?.as_str();
                    let english = EXAMPLE_ENGLISH.captures(inner)?.get(1)?.as_str();
                    let mut map = Map::new();
                    map.insert("english".into(), Value::String(english.to_string()));
                    if let Some(b) = EXAMPLE_BURMESE.captures(inner).and_then(|c| c.get(1)) {
                        map.insert(
                            "burmese_translation".into(),
                            Value::String(b.as_str().to_string()),
                        );
                    }
                    Some(Value::Object(map))
                })
                .collect()
        })
        .unwrap_or_default();
    if !from_json.is_empty() {
        return from_json;
    }

    let mut lines: Vec<String> = Vec::new();
    for re in EXAMPLE_LINE_PATTERNS.iter() {
        for cap in re.captures_iter(text) {
            let Some(m) = cap.get(1) else { continue };
            let line = m.as_str().trim().trim_matches('"').trim();
            if line.chars().count() > MIN_EXAMPLE_CHARS && !lines.iter().any(|l| l == line) {
                lines.push(line.to_string());
            }
        }
    }
    lines.into_iter().map(Value::String).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HELLO: &str = r#"{"word":"hello","part_of_speech":"interjection","burmese":"မင်္ဂလာပါ","definition":{"english":"a greeting","burmese":"နှုတ်ဆက်စကား"},"examples":[{"english":"Hello!","burmese_translation":"မင်္ဂလာပါ!"}]}"#;

    #[test]
    fn well_formed_entry_is_kept_and_padded() {
        let entry = normalize(HELLO, "hello");
        assert_eq!(entry.word, "hello");
        assert_eq!(entry.part_of_speech, PartOfSpeech::Interjection);
        assert_eq!(entry.burmese, "မင်္ဂလာပါ");
        assert_eq!(entry.definition.english, "a greeting");
        assert_eq!(entry.definition.burmese, "နှုတ်ဆက်စကား");
        assert_eq!(entry.examples[0].english, "Hello!");
        assert_eq!(entry.examples[0].burmese_translation, "မင်္ဂလာပါ!");
        assert_eq!(entry.examples[1], Example::placeholder("hello", 2));
        assert_eq!(entry.examples[2], Example::placeholder("hello", 3));
    }

    #[test]
    fn complete_entry_passes_through_untouched() {
        let raw = json!({
            "word": "run",
            "part_of_speech": "verb",
            "burmese": "ပြေး",
            "definition": {"english": "move fast on foot", "burmese": "ခြေဖြင့် မြန်မြန်သွားသည်"},
            "examples": [
                {"english": "I run daily.", "burmese_translation": "နေ့တိုင်းပြေးတယ်။"},
                {"english": "Run home.", "burmese_translation": "အိမ်ပြေးပါ။"},
                {"english": "They run fast.", "burmese_translation": "သူတို့ မြန်မြန်ပြေးတယ်။"},
                {"english": "Extra one.", "burmese_translation": "အပို"}
            ]
        })
        .to_string();
        let entry = normalize(&format!("Sure! Here it is:\n```json\n{raw}\n```"), "run");
        assert_eq!(entry.part_of_speech.as_str(), "verb");
        assert_eq!(entry.burmese, "ပြေး");
        assert_eq!(entry.definition.english, "move fast on foot");
        assert_eq!(entry.examples[2].english, "They run fast.");
        assert_eq!(entry.examples.len(), EXAMPLE_COUNT);
    }

    #[test]
    fn missing_fields_are_filled() {
        let entry = normalize(r#"{"definition": "a small animal"}"#, "cat");
        assert_eq!(entry.word, "Missing word");
        assert_eq!(entry.part_of_speech.as_str(), "Missing part_of_speech");
        assert_eq!(entry.burmese, "Missing burmese");
        for (i, ex) in entry.examples.iter().enumerate() {
            assert_eq!(ex, &Example::placeholder("cat", i + 1));
            assert!(ex.english.contains("cat"));
        }
    }

    #[test]
    fn missing_definition_gets_bilingual_placeholder() {
        let entry = normalize(r#"{"word":"cat","examples":[]}"#, "cat");
        assert_eq!(entry.definition, Definition::not_available());
    }

    #[test]
    fn string_definition_is_wrapped_with_gloss() {
        let entry = normalize(r#"{"definition": "D"}"#, "x");
        assert_eq!(entry.definition.english, "D");
        assert!(!entry.definition.burmese.is_empty());
    }

    #[test]
    fn gloss_prefers_longer_glossary_keys() {
        let out = heuristic_burmese("an adverb describing something");
        assert!(out.contains("ကြိယာဝိသေသန"));
        assert!(out.contains("တစ်စုံတစ်ရာ"));
        assert!(!out.contains("adကြိယာ"));
        assert!(out.ends_with(GLOSS_SUFFIX));
    }

    #[test]
    fn definition_shapes() {
        let only_english = normalize_definition(&json!({"english": "a fruit"}), "apple");
        assert_eq!(only_english.english, "a fruit");
        assert!(only_english.burmese.ends_with(GLOSS_SUFFIX));

        let keyed = normalize_definition(&json!({"definition": "a fruit"}), "apple");
        assert_eq!(keyed.english, "a fruit");

        let odd = normalize_definition(&json!(42), "apple");
        assert_eq!(odd, Definition::for_word("apple"));
    }

    #[test]
    fn examples_accept_strings_and_alias_keys() {
        let items = vec![
            json!("A plain example sentence."),
            json!({"sentence": "Aliased sentence.", "translation": "ဘာသာပြန်"}),
            json!(7),
            json!({"example": "Third one.", "burmese": "တတိယ"}),
        ];
        let out = normalize_examples(&items, "word");
        assert_eq!(out[0].english, "A plain example sentence.");
        assert!(out[0].burmese_translation.contains("word"));
        assert_eq!(out[1].english, "Aliased sentence.");
        assert_eq!(out[1].burmese_translation, "ဘာသာပြန်");
        assert_eq!(out[2].english, "Third one.");
        assert_eq!(out[2].burmese_translation, "တတိယ");
    }

    #[test]
    fn non_array_examples_become_placeholders() {
        let entry = normalize(r#"{"word":"a","examples":"none"}"#, "a");
        assert_eq!(entry.examples[0], Example::placeholder("a", 1));
    }

    #[test]
    fn apology_without_structure_uses_defaults() {
        let entry = normalize("Sorry, I cannot help.", "foo");
        assert_eq!(entry.word, "foo");
        assert_eq!(entry.part_of_speech, PartOfSpeech::Unknown);
        assert_eq!(entry.burmese, "ဘာသာပြန်မရှိပါ");
        assert_eq!(entry.definition.english, NO_DEFINITION);
        for ex in &entry.examples {
            assert!(ex.english.contains("foo"));
        }
    }

    #[test]
    fn truncated_json_is_mined_field_by_field() {
        let raw = r#"{"word": "book", "part_of_speech": "Noun", "burmese": "စာအုပ်",
            "definition": "a written work", "examples": [
              {"english": "I read a book.", "burmese_translation": "စာအုပ်ဖတ်တယ်။"},
              {"english": "Book a table."}
            ], "note": "#;
        let entry = normalize(raw, "book");
        assert_eq!(entry.part_of_speech, PartOfSpeech::Noun);
        assert_eq!(entry.burmese, "စာအုပ်");
        assert_eq!(entry.definition.english, "a written work");
        assert_eq!(entry.examples[0].english, "I read a book.");
        assert_eq!(entry.examples[0].burmese_translation, "စာအုပ်ဖတ်တယ်။");
        assert_eq!(entry.examples[1].english, "Book a table.");
        assert_eq!(entry.examples[2], Example::placeholder("book", 3));
    }

    #[test]
    fn plain_text_answer_is_mined() {
        let raw = "Part of speech: adjective\nBurmese: လှပသော\nDefinition: pleasing to look at\n\
                   1. The garden looks beautiful today.\n2. She wore a beautiful dress.\n- ok\n";
        let entry = normalize(raw, "beautiful");
        assert_eq!(entry.part_of_speech, PartOfSpeech::Adjective);
        assert_eq!(entry.burmese, "လှပသော");
        assert_eq!(entry.definition.english, "pleasing to look at");
        assert_eq!(entry.examples[0].english, "The garden looks beautiful today.");
        assert_eq!(entry.examples[1].english, "She wore a beautiful dress.");
        assert_eq!(entry.examples[2], Example::placeholder("beautiful", 3));
    }

    #[test]
    fn balanced_span_ignores_braces_in_strings() {
        let text = r#"noise {"a": "}", "b": {"c": 1}} trailing }"#;
        assert_eq!(
            balanced_object_span(text),
            Some(r#"{"a": "}", "b": {"c": 1}}"#)
        );
        assert_eq!(balanced_object_span("no braces"), None);
        assert_eq!(balanced_object_span("{ never closed"), None);
    }

    #[test]
    fn empty_values_under_present_keys_are_kept() {
        let raw = json!({
            "word": "run",
            "part_of_speech": "verb",
            "burmese": "ပြေး",
            "definition": {"english": "move fast", "burmese": ""},
            "examples": [
                {"english": "I run.", "burmese_translation": ""},
                {"english": "", "burmese_translation": "ပြေးပါ။"},
                {"english": "We run.", "burmese_translation": "ကျွန်တော်တို့ ပြေးတယ်။"}
            ]
        })
        .to_string();
        let entry = normalize(&raw, "run");
        assert_eq!(entry.definition.english, "move fast");
        assert_eq!(entry.definition.burmese, "");
        assert_eq!(entry.examples[0].burmese_translation, "");
        assert_eq!(entry.examples[1].english, "");
        assert_eq!(entry.examples[2].english, "We run.");
    }

    #[test]
    fn normalizing_twice_is_identical() {
        for raw in [HELLO, "Sorry, I cannot help.", "{broken json", ""] {
            assert_eq!(normalize(raw, "w"), normalize(raw, "w"));
        }
    }
}
