//! Answer resolution: maps loosely keyed intake answers onto real questions.
//!
//! Submissions arrive as a JSON object whose keys may be real question ids,
//! short mnemonic codes (`q_budget`, `q_date`, ...), legacy mock ids (`q5`,
//! `q_Date`) or stale ids from an older schema version. [`resolve_answers`]
//! classifies each key as an [`AnswerKey`], remaps mnemonics through the
//! [`Mnemonic`] synonym table, extracts the client and project name signals,
//! and sorts everything else into "needs a database check" or "dropped".
//!
//! The reverse path ([`display_prompt`], [`AnswerValue::render`]) turns stored
//! answers back into what the form submitted.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;
use crate::question::{QuestionType, SchemaQuestion};
use crate::types::QuestionId;

// ---------------------------------------------------------------------------
// Identifier shapes
// ---------------------------------------------------------------------------

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("valid regex")
});

static CUID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^c[a-z0-9]{24}$").expect("valid regex"));

static DISPLAY_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("valid regex"));

/// Returns `true` when `key` has the shape of a persisted question id
/// (hyphenated UUID or CUID).
pub fn is_persisted_id_shape(key: &str) -> bool {
    UUID_RE.is_match(key) || CUID_RE.is_match(key)
}

/// Returns `true` when `value` looks like an `MM/DD/YYYY` date.
pub fn is_display_date(value: &str) -> bool {
    DISPLAY_DATE_RE.is_match(value.trim())
}

// ---------------------------------------------------------------------------
// Synonym table
// ---------------------------------------------------------------------------

/// Prompts that mark an answer as the client/company name.
pub const CLIENT_NAME_PROMPTS: &[&str] = &["Client Name", "Company Name", "Company", "Brand Name"];

/// Prompts that mark an answer as the project name.
pub const PROJECT_NAME_PROMPTS: &[&str] = &["Project Name", "Campaign Title"];

/// Question ids left behind by older intake clients. Answers keyed by these
/// always held the delivery date.
pub const LEGACY_DATE_IDS: &[&str] = &["q_Date", "q5", "q_date_fallback"];

/// Display label for answers with no prompt and no recognisable shape.
pub const FALLBACK_PROMPT: &str = "Additional Info";

/// Well-known short answer codes used in transit by intake clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mnemonic {
    Budget,
    Date,
    Client,
    ProjectName,
    Description,
    Timeline,
}

/// Raw key (lower-cased) to mnemonic. Includes the ids of the old mock form.
const MNEMONIC_KEYS: &[(&str, Mnemonic)] = &[
    ("q_budget", Mnemonic::Budget),
    ("q2", Mnemonic::Budget),
    ("q_date", Mnemonic::Date),
    ("q5", Mnemonic::Date),
    ("q_client", Mnemonic::Client),
    ("q_project_name", Mnemonic::ProjectName),
    ("q1", Mnemonic::ProjectName),
    ("q_description", Mnemonic::Description),
    ("q4", Mnemonic::Description),
    ("q_timeline", Mnemonic::Timeline),
    ("q3", Mnemonic::Timeline),
];

impl Mnemonic {
    /// Classify a raw answer key. Matching is case-insensitive, and any key
    /// starting with `q_date_fallback` is a date.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_lowercase();
        if key.starts_with("q_date_fallback") {
            return Some(Mnemonic::Date);
        }
        MNEMONIC_KEYS
            .iter()
            .find(|(code, _)| *code == key)
            .map(|(_, m)| *m)
    }

    /// Canonical in-transit code.
    pub fn code(self) -> &'static str {
        match self {
            Mnemonic::Budget => "q_budget",
            Mnemonic::Date => "q_date",
            Mnemonic::Client => "q_client",
            Mnemonic::ProjectName => "q_project_name",
            Mnemonic::Description => "q_description",
            Mnemonic::Timeline => "q_timeline",
        }
    }

    /// Question prompts this code may stand for, in preference order.
    pub fn candidate_prompts(self) -> &'static [&'static str] {
        match self {
            Mnemonic::Budget => &["Budget Range", "Budget", "Estimated Budget"],
            Mnemonic::Date => &[
                "Target Delivery Date",
                "Event Date",
                "Delivery Deadline",
                "Target Shoot Date",
            ],
            Mnemonic::Client => CLIENT_NAME_PROMPTS,
            Mnemonic::ProjectName => &[
                "Project Name",
                "Campaign Title",
                "Campaign Name",
                "Event Name",
            ],
            Mnemonic::Description => &[
                "Project Description",
                "Creative Brief",
                "Description & Specs",
                "Concept Description",
            ],
            Mnemonic::Timeline => &["Timeline"],
        }
    }

    /// Question type to fall back on when no prompt matches.
    fn fallback_type(self) -> Option<QuestionType> {
        match self {
            Mnemonic::Date => Some(QuestionType::Date),
            Mnemonic::Description => Some(QuestionType::LongText),
            _ => None,
        }
    }

    /// Find the schema question this code maps to, if any.
    pub fn find_question(self, schema: &[SchemaQuestion]) -> Option<&SchemaQuestion> {
        let persisted = || schema.iter().filter(|q| !q.is_placeholder);

        self.candidate_prompts()
            .iter()
            .find_map(|candidate| persisted().find(|q| prompt_eq(&q.prompt, candidate)))
            .or_else(|| {
                self.fallback_type()
                    .and_then(|t| persisted().find(|q| q.question_type == t))
            })
    }
}

fn prompt_eq(prompt: &str, candidate: &str) -> bool {
    prompt.trim().eq_ignore_ascii_case(candidate)
}

fn prompt_in(prompt: &str, set: &[&str]) -> bool {
    set.iter().any(|c| prompt_eq(prompt, c))
}

// ---------------------------------------------------------------------------
// AnswerKey
// ---------------------------------------------------------------------------

/// What an incoming answer key turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerKey {
    /// Id of a persisted question in the active schema.
    Canonical(QuestionId),
    /// A known short code, remapped through the synonym table.
    Mnemonic(Mnemonic),
    /// Anything else.
    Orphan(String),
}

impl AnswerKey {
    pub fn classify(raw: &str, schema: &[SchemaQuestion]) -> Self {
        if schema.iter().any(|q| !q.is_placeholder && q.id == raw) {
            return AnswerKey::Canonical(raw.to_string());
        }
        match Mnemonic::parse(raw) {
            Some(m) => AnswerKey::Mnemonic(m),
            None => AnswerKey::Orphan(raw.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// AnswerValue
// ---------------------------------------------------------------------------

/// Storage form of one answer value.
///
/// Strings are kept verbatim in `text`. Any other non-null JSON value is
/// kept structurally in `json` and serialized into `text` for display.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AnswerValue {
    pub text: Option<String>,
    pub json: Option<serde_json::Value>,
}

impl AnswerValue {
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::default(),
            serde_json::Value::String(s) => Self {
                text: Some(s.clone()),
                json: None,
            },
            other => Self {
                text: Some(other.to_string()),
                json: Some(other.clone()),
            },
        }
    }

    /// Rebuild the value the client originally submitted.
    pub fn render(text: Option<&str>, json: Option<&serde_json::Value>) -> serde_json::Value {
        match (json, text) {
            (Some(j), _) => j.clone(),
            (None, Some(t)) => serde_json::Value::String(t.to_string()),
            (None, None) => serde_json::Value::Null,
        }
    }

    /// `true` when the answer carries nothing a reviewer could read.
    pub fn is_blank(&self) -> bool {
        match &self.json {
            Some(serde_json::Value::Array(items)) => items.is_empty(),
            Some(serde_json::Value::Object(map)) => map.is_empty(),
            _ => self.text.as_deref().map_or(true, |t| t.trim().is_empty()),
        }
    }

    fn as_name(&self) -> Option<String> {
        if self.json.is_some() {
            return None;
        }
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// An answer bound to a question id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAnswer {
    pub question_id: QuestionId,
    pub value: AnswerValue,
}

/// Why an answer was left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DropReason {
    /// A mnemonic with no matching question in the active schema.
    NoMatchingQuestion { mnemonic: Mnemonic },
    /// A key that cannot be a persisted question id.
    InvalidKey,
    /// A well-shaped id that does not exist in storage.
    UnknownQuestion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedAnswer {
    pub key: String,
    #[serde(flatten)]
    pub reason: DropReason,
}

/// Output of [`resolve_answers`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resolution {
    /// Answers bound to questions of the active schema, in schema order.
    pub answers: Vec<ResolvedAnswer>,
    /// Answers keyed by a well-shaped id outside the active schema. They are
    /// kept only if the question exists in storage; see [`Resolution::verify`].
    pub unverified: Vec<ResolvedAnswer>,
    pub dropped: Vec<DroppedAnswer>,
    pub client_name: Option<String>,
    pub project_name: Option<String>,
}

impl Resolution {
    /// Keep the unverified answers whose ids exist, drop the rest.
    pub fn verify(&mut self, existing: &HashSet<QuestionId>) {
        for answer in std::mem::take(&mut self.unverified) {
            if existing.contains(&answer.question_id) {
                self.answers.push(answer);
            } else {
                self.dropped.push(DroppedAnswer {
                    key: answer.question_id,
                    reason: DropReason::UnknownQuestion,
                });
            }
        }
    }

    /// All answers ready to persist (verified or not).
    pub fn persistable(&self) -> impl Iterator<Item = &ResolvedAnswer> {
        self.answers.iter().chain(self.unverified.iter())
    }
}

/// Map a raw `{ key: value }` submission onto the active schema.
///
/// Canonical keys take precedence over mnemonic keys targeting the same
/// question. Never fails: unresolvable answers end up in
/// [`Resolution::dropped`].
pub fn resolve_answers(
    raw: &serde_json::Map<String, serde_json::Value>,
    schema: &[SchemaQuestion],
) -> Resolution {
    let mut bound: BTreeMap<QuestionId, AnswerValue> = BTreeMap::new();
    let mut resolution = Resolution::default();
    let mut mnemonics: Vec<(&str, Mnemonic, AnswerValue)> = Vec::new();

    for (key, value) in raw {
        let value = AnswerValue::from_json(value);
        match AnswerKey::classify(key, schema) {
            AnswerKey::Canonical(id) => {
                bound.insert(id, value);
            }
            AnswerKey::Mnemonic(m) => mnemonics.push((key.as_str(), m, value)),
            AnswerKey::Orphan(id) => {
                if is_persisted_id_shape(&id) {
                    resolution.unverified.push(ResolvedAnswer {
                        question_id: id,
                        value,
                    });
                } else {
                    resolution.dropped.push(DroppedAnswer {
                        key: id,
                        reason: DropReason::InvalidKey,
                    });
                }
            }
        }
    }

    // Names carried by mnemonics apply only when no stored question supplies one.
    let mut mnemonic_client: Option<String> = None;
    let mut mnemonic_project: Option<String> = None;

    for (key, mnemonic, value) in mnemonics {
        match mnemonic {
            Mnemonic::Client if mnemonic_client.is_none() => {
                mnemonic_client = value.as_name();
            }
            Mnemonic::ProjectName if mnemonic_project.is_none() => {
                mnemonic_project = value.as_name();
            }
            _ => {}
        }

        match mnemonic.find_question(schema) {
            Some(q) if !bound.contains_key(&q.id) => {
                bound.insert(q.id.clone(), value);
            }
            Some(_) => {}
            None => resolution.dropped.push(DroppedAnswer {
                key: key.to_string(),
                reason: DropReason::NoMatchingQuestion { mnemonic },
            }),
        }
    }

    for q in schema.iter().filter(|q| !q.is_placeholder) {
        let Some(value) = bound.remove(&q.id) else {
            continue;
        };

        if !is_persisted_id_shape(&q.id) {
            resolution.dropped.push(DroppedAnswer {
                key: q.id.clone(),
                reason: DropReason::InvalidKey,
            });
            continue;
        }

        if prompt_in(&q.prompt, CLIENT_NAME_PROMPTS) {
            if let Some(name) = value.as_name() {
                resolution.client_name.get_or_insert(name);
            }
        } else if prompt_in(&q.prompt, PROJECT_NAME_PROMPTS) {
            if let Some(name) = value.as_name() {
                resolution.project_name.get_or_insert(name);
            }
        }

        resolution.answers.push(ResolvedAnswer {
            question_id: q.id.clone(),
            value,
        });
    }

    if resolution.client_name.is_none() {
        resolution.client_name = mnemonic_client;
    }
    if resolution.project_name.is_none() {
        resolution.project_name = mnemonic_project;
    }

    resolution
}

/// Reject the submission when a required question of the active schema has
/// no usable answer.
pub fn validate_required(schema: &[SchemaQuestion], resolution: &Resolution) -> Result<(), CoreError> {
    let answered: HashSet<&str> = resolution
        .answers
        .iter()
        .filter(|a| !a.value.is_blank())
        .map(|a| a.question_id.as_str())
        .collect();

    match schema
        .iter()
        .find(|q| q.required && !q.is_placeholder && !answered.contains(q.id.as_str()))
    {
        Some(missing) => Err(CoreError::Validation(format!(
            "Please answer: {}",
            missing.prompt
        ))),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Display path
// ---------------------------------------------------------------------------

/// Label to show next to a stored answer.
///
/// Uses the question prompt when there is one; otherwise infers a label from
/// legacy ids or a date-shaped value. Feeding the result back in as `prompt`
/// returns it unchanged.
pub fn display_prompt(prompt: Option<&str>, question_id: &str, value_text: Option<&str>) -> String {
    if let Some(p) = prompt.map(str::trim).filter(|p| !p.is_empty()) {
        return p.to_string();
    }
    if LEGACY_DATE_IDS.contains(&question_id) {
        return crate::question::DATE_PLACEHOLDER_PROMPT.to_string();
    }
    if value_text.is_some_and(is_display_date) {
        return "Date".to_string();
    }
    FALLBACK_PROMPT.to_string()
}

/// Borrowed view of a stored answer joined with its question, used by the
/// commission calculator and the SOW template.
#[derive(Debug, Clone, Copy)]
pub struct StoredAnswer<'a> {
    pub question_id: &'a str,
    pub prompt: Option<&'a str>,
    pub question_type: Option<QuestionType>,
    pub value_text: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::question::assemble_active_schema;

    const NAME_ID: &str = "0b6f1c4e-0000-4000-8000-000000000001";
    const BUDGET_ID: &str = "0b6f1c4e-0000-4000-8000-000000000002";
    const DATE_ID: &str = "0b6f1c4e-0000-4000-8000-000000000003";
    const CLIENT_ID: &str = "ckq8x2m9a0000abcdefghijkl";
    const DESC_ID: &str = "0b6f1c4e-0000-4000-8000-000000000005";

    fn q(id: &str, t: QuestionType, prompt: &str, ordering: i32, required: bool) -> SchemaQuestion {
        SchemaQuestion {
            id: id.to_string(),
            question_type: t,
            prompt: prompt.to_string(),
            help_text: None,
            required,
            ordering,
            options: None,
            is_placeholder: false,
        }
    }

    fn schema() -> Vec<SchemaQuestion> {
        assemble_active_schema(vec![
            q(NAME_ID, QuestionType::ShortText, "Project Name", 1, true),
            q(BUDGET_ID, QuestionType::SingleSelect, "Budget Range", 2, true),
            q(DATE_ID, QuestionType::Date, "Target Delivery Date", 3, false),
            q(CLIENT_ID, QuestionType::ShortText, "Company Name", 4, false),
            q(DESC_ID, QuestionType::LongText, "Project Description", 5, false),
        ])
    }

    fn raw(v: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn id_shapes() {
        assert!(is_persisted_id_shape(NAME_ID));
        assert!(is_persisted_id_shape(CLIENT_ID));
        assert!(!is_persisted_id_shape("q_budget"));
        assert!(!is_persisted_id_shape("q5"));
        assert!(!is_persisted_id_shape(""));
        assert!(!is_persisted_id_shape("0b6f1c4e00004000800000000000000001"));
    }

    #[test]
    fn mnemonic_parse_is_case_insensitive_and_handles_fallback_prefix() {
        assert_eq!(Mnemonic::parse("q_Date"), Some(Mnemonic::Date));
        assert_eq!(Mnemonic::parse("q_date_fallback_2"), Some(Mnemonic::Date));
        assert_eq!(Mnemonic::parse("q5"), Some(Mnemonic::Date));
        assert_eq!(Mnemonic::parse("Q_BUDGET"), Some(Mnemonic::Budget));
        assert_eq!(Mnemonic::parse("q_unknown"), None);
    }

    #[test]
    fn classify_keys() {
        let s = schema();
        assert_eq!(
            AnswerKey::classify(NAME_ID, &s),
            AnswerKey::Canonical(NAME_ID.to_string())
        );
        assert_eq!(
            AnswerKey::classify("q_budget", &s),
            AnswerKey::Mnemonic(Mnemonic::Budget)
        );
        assert_eq!(
            AnswerKey::classify("whatever", &s),
            AnswerKey::Orphan("whatever".to_string())
        );
    }

    #[test]
    fn mnemonics_remap_to_question_ids() {
        let s = schema();
        let r = resolve_answers(
            &raw(json!({
                "q_budget": "$10k - $25k",
                "q_date": "03/15/2026",
                "q_project_name": "Spring Launch",
            })),
            &s,
        );
        let ids: Vec<_> = r.answers.iter().map(|a| a.question_id.as_str()).collect();
        assert_eq!(ids, vec![NAME_ID, BUDGET_ID, DATE_ID]);
        assert_eq!(r.project_name.as_deref(), Some("Spring Launch"));
        assert!(r.dropped.is_empty());
    }

    #[test]
    fn date_mnemonic_falls_back_to_date_typed_question() {
        let s = assemble_active_schema(vec![
            q(NAME_ID, QuestionType::ShortText, "Project Name", 1, true),
            q(DATE_ID, QuestionType::Date, "Go-Live", 2, false),
        ]);
        let r = resolve_answers(&raw(json!({"q_date_fallback": "01/02/2027"})), &s);
        assert_eq!(r.answers.len(), 1);
        assert_eq!(r.answers[0].question_id, DATE_ID);
    }

    #[test]
    fn placeholder_date_answer_is_dropped_when_schema_has_no_date() {
        let s = assemble_active_schema(vec![q(
            NAME_ID,
            QuestionType::ShortText,
            "Project Name",
            1,
            true,
        )]);
        let r = resolve_answers(
            &raw(json!({ NAME_ID: "Promo", "q_date_fallback": "01/02/2027" })),
            &s,
        );
        assert_eq!(r.answers.len(), 1);
        assert_eq!(r.dropped.len(), 1);
        assert_eq!(
            r.dropped[0].reason,
            DropReason::NoMatchingQuestion {
                mnemonic: Mnemonic::Date
            }
        );
    }

    #[test]
    fn canonical_key_wins_over_mnemonic() {
        let s = schema();
        let r = resolve_answers(
            &raw(json!({ BUDGET_ID: "$25k+", "q_budget": "$5k - $10k" })),
            &s,
        );
        assert_eq!(r.answers.len(), 1);
        assert_eq!(r.answers[0].value.text.as_deref(), Some("$25k+"));
    }

    #[test]
    fn canonical_client_answer_names_the_client() {
        let s = schema();
        let r = resolve_answers(
            &raw(json!({ CLIENT_ID: "Northwind", "q_client": "Contoso" })),
            &s,
        );
        let stored = r.answers.iter().find(|a| a.question_id == CLIENT_ID).unwrap();
        assert_eq!(stored.value.text.as_deref(), Some("Northwind"));
        assert_eq!(r.client_name.as_deref(), Some("Northwind"));
    }

    #[test]
    fn mnemonic_names_apply_without_matching_question() {
        let s = assemble_active_schema(vec![q(
            BUDGET_ID,
            QuestionType::SingleSelect,
            "Budget Range",
            1,
            true,
        )]);
        let r = resolve_answers(
            &raw(json!({ "q_client": "Contoso", "q_project_name": "Promo" })),
            &s,
        );
        assert_eq!(r.client_name.as_deref(), Some("Contoso"));
        assert_eq!(r.project_name.as_deref(), Some("Promo"));
        assert_eq!(r.dropped.len(), 2);
    }

    #[test]
    fn extracts_client_name_from_canonical_prompt() {
        let s = schema();
        let r = resolve_answers(
            &raw(json!({ CLIENT_ID: "  Acme Studios ", NAME_ID: "Launch" })),
            &s,
        );
        assert_eq!(r.client_name.as_deref(), Some("Acme Studios"));
        assert_eq!(r.project_name.as_deref(), Some("Launch"));
    }

    #[test]
    fn client_mnemonic_is_extracted_even_without_matching_question() {
        let s = assemble_active_schema(vec![q(
            NAME_ID,
            QuestionType::ShortText,
            "Project Name",
            1,
            true,
        )]);
        let r = resolve_answers(&raw(json!({ "q_client": "Acme Studios" })), &s);
        assert_eq!(r.client_name.as_deref(), Some("Acme Studios"));
        assert!(r.answers.is_empty());
        assert_eq!(r.dropped.len(), 1);
    }

    #[test]
    fn invalid_keys_are_dropped_without_error() {
        let s = schema();
        let r = resolve_answers(
            &raw(json!({ "q_nonsense": "x", "mock-7": "y", NAME_ID: "Keep" })),
            &s,
        );
        assert_eq!(r.answers.len(), 1);
        assert_eq!(r.dropped.len(), 2);
        assert!(r
            .dropped
            .iter()
            .all(|d| d.reason == DropReason::InvalidKey));
    }

    #[test]
    fn well_shaped_orphans_need_verification() {
        let s = schema();
        let stale = "0b6f1c4e-0000-4000-8000-0000000000ff";
        let gone = "0b6f1c4e-0000-4000-8000-0000000000ee";
        let mut r = resolve_answers(&raw(json!({ stale: "old", gone: "lost" })), &s);
        assert_eq!(r.unverified.len(), 2);
        assert_eq!(r.persistable().count(), 2);

        let existing: HashSet<QuestionId> = [stale.to_string()].into_iter().collect();
        r.verify(&existing);
        assert_eq!(r.answers.len(), 1);
        assert_eq!(r.answers[0].question_id, stale);
        assert_eq!(r.dropped.len(), 1);
        assert_eq!(r.dropped[0].reason, DropReason::UnknownQuestion);
    }

    #[test]
    fn round_trip_reproduces_submitted_values() {
        let s = schema();
        let submitted = json!({
            NAME_ID: "Spring Launch",
            BUDGET_ID: ["$10k - $25k"],
            DESC_ID: "Line one\nLine two",
            DATE_ID: 20270102,
        });
        let r = resolve_answers(&raw(submitted.clone()), &s);
        assert_eq!(r.answers.len(), 4);
        for a in &r.answers {
            let rendered = AnswerValue::render(a.value.text.as_deref(), a.value.json.as_ref());
            assert_eq!(rendered, submitted[&a.question_id]);
        }
    }

    #[test]
    fn structured_values_keep_json_and_text() {
        let v = AnswerValue::from_json(&json!(["a", "b"]));
        assert_eq!(v.text.as_deref(), Some(r#"["a","b"]"#));
        assert_eq!(v.json, Some(json!(["a", "b"])));
        assert!(AnswerValue::from_json(&json!(null)).is_blank());
        assert!(AnswerValue::from_json(&json!([])).is_blank());
        assert!(AnswerValue::from_json(&json!("  ")).is_blank());
    }

    #[test]
    fn required_questions_must_be_answered() {
        let s = schema();
        let r = resolve_answers(&raw(json!({ NAME_ID: "Launch" })), &s);
        let err = validate_required(&s, &r).unwrap_err();
        assert!(err.to_string().contains("Budget Range"));

        let r = resolve_answers(&raw(json!({ NAME_ID: "Launch", "q_budget": "$5k - $10k" })), &s);
        assert!(validate_required(&s, &r).is_ok());
    }

    #[test]
    fn display_prompt_inference() {
        assert_eq!(display_prompt(Some("Budget Range"), BUDGET_ID, None), "Budget Range");
        assert_eq!(
            display_prompt(None, "q_Date", Some("whenever")),
            "Target Delivery Date"
        );
        assert_eq!(display_prompt(Some(""), "abc", Some("04/30/2026")), "Date");
        assert_eq!(display_prompt(None, "abc", Some("hello")), FALLBACK_PROMPT);
        assert_eq!(display_prompt(None, "abc", None), FALLBACK_PROMPT);
    }

    #[test]
    fn display_prompt_is_idempotent() {
        for (id, value) in [
            ("q5", Some("x")),
            ("abc", Some("12/31/2026")),
            ("abc", Some("free text")),
            (NAME_ID, None),
        ] {
            let once = display_prompt(None, id, value);
            let twice = display_prompt(Some(&once), id, value);
            assert_eq!(once, twice);
        }
    }
}
