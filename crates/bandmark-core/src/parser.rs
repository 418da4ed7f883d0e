//! TOML test-set parser.
//!
//! Loads test sets from TOML files and directories, and validates them.
//! Question keys are written in whatever scalar/array shape is natural and
//! are coerced during conversion; a question whose `type` this engine does
//! not recognize parses as unsupported rather than failing the file, since
//! one exotic question must not block scoring of the rest.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{ChoiceMode, OneOrMany, Question, QuestionKind, Skill, TestSet};

/// Intermediate TOML structure for parsing test-set files.
#[derive(Debug, Deserialize)]
struct TomlTestFile {
    test_set: TomlTestSetHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlTestSetHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_skill_str")]
    skill: String,
    #[serde(default)]
    part: Option<u32>,
}

fn default_skill_str() -> String {
    "reading".to_string()
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
    answer: toml::Value,
    #[serde(default)]
    answer_type: Option<String>,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    headings: Vec<String>,
    #[serde(default)]
    word_limit: Option<u32>,
}

/// Parse a single TOML file into a [`TestSet`].
pub fn parse_test_set(path: &Path) -> Result<TestSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read test set file: {}", path.display()))?;

    parse_test_set_str(&content, path)
}

/// Parse a TOML string into a [`TestSet`] (useful for testing).
pub fn parse_test_set_str(content: &str, source_path: &Path) -> Result<TestSet> {
    let parsed: TomlTestFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let skill: Skill = parsed
        .test_set
        .skill
        .parse()
        .map_err(|e: String| anyhow::anyhow!("{}", e))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let id = q.id.clone();
            convert_question(q).with_context(|| format!("question '{id}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TestSet {
        id: parsed.test_set.id,
        name: parsed.test_set.name,
        description: parsed.test_set.description,
        skill,
        part: parsed.test_set.part,
        questions,
    })
}

fn convert_question(q: TomlQuestion) -> Result<Question> {
    let kind = match q.kind.as_str() {
        "multiple_choice" => {
            let mode = match q.answer_type.as_deref() {
                None | Some("single") => ChoiceMode::Single,
                Some("multiple") => ChoiceMode::Multiple,
                Some(other) => anyhow::bail!("unknown answer_type: {other}"),
            };
            QuestionKind::MultipleChoice {
                mode,
                answer: index_key(&q.answer)?,
                options: q.options,
            }
        }
        "true_false_not_given" => QuestionKind::TrueFalseNotGiven {
            answer: text_key(&q.answer)?,
        },
        "yes_no_not_given" => QuestionKind::YesNoNotGiven {
            answer: text_key(&q.answer)?,
        },
        "matching_headings" => QuestionKind::MatchingHeadings {
            answer: pair_key(&q.answer)?,
            headings: q.headings,
        },
        "sentence_completion" => QuestionKind::SentenceCompletion {
            answer: text_key(&q.answer)?,
            word_limit: q.word_limit,
        },
        "short_answer" => QuestionKind::ShortAnswer {
            answer: text_key(&q.answer)?,
            word_limit: q.word_limit,
        },
        "summary_completion" => QuestionKind::SummaryCompletion {
            answer: text_list_key(&q.answer)?,
        },
        "table_completion" => QuestionKind::TableCompletion {
            answer: group_key(&q.answer)?,
        },
        "diagram_label_completion" => QuestionKind::DiagramLabelCompletion {
            answer: text_list_key(&q.answer)?,
        },
        other => {
            tracing::warn!("question type '{other}' is not supported, it will score zero");
            QuestionKind::Unsupported
        }
    };

    Ok(Question {
        id: q.id,
        text: q.text,
        kind,
    })
}

fn index_key(value: &toml::Value) -> Result<OneOrMany<u32>> {
    match value {
        toml::Value::Integer(i) => Ok(OneOrMany::One(index_from(*i)?)),
        toml::Value::Array(items) => Ok(OneOrMany::Many(
            items
                .iter()
                .map(|item| match item {
                    toml::Value::Integer(i) => index_from(*i),
                    other => anyhow::bail!("expected an option index, got {other}"),
                })
                .collect::<Result<Vec<_>>>()?,
        )),
        other => anyhow::bail!("expected an option index or a list of them, got {other}"),
    }
}

fn index_from(i: i64) -> Result<u32> {
    u32::try_from(i).map_err(|_| anyhow::anyhow!("option index out of range: {i}"))
}

fn text_key(value: &toml::Value) -> Result<String> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        other => anyhow::bail!("expected a string answer, got {other}"),
    }
}

fn text_list_key(value: &toml::Value) -> Result<OneOrMany<String>> {
    match value {
        toml::Value::String(s) => Ok(OneOrMany::One(s.clone())),
        toml::Value::Array(items) => Ok(OneOrMany::Many(
            items
                .iter()
                .map(|item| match item {
                    toml::Value::String(s) => Ok(s.clone()),
                    other => anyhow::bail!("expected a string, got {other}"),
                })
                .collect::<Result<Vec<_>>>()?,
        )),
        other => anyhow::bail!("expected a string or a list of strings, got {other}"),
    }
}

fn pair_key(value: &toml::Value) -> Result<BTreeMap<String, String>> {
    let toml::Value::Table(table) = value else {
        anyhow::bail!("expected a key-to-label table, got {value}");
    };
    table
        .iter()
        .map(|(k, v)| Ok((k.clone(), text_key(v)?)))
        .collect()
}

fn group_key(value: &toml::Value) -> Result<BTreeMap<String, OneOrMany<String>>> {
    let toml::Value::Table(table) = value else {
        anyhow::bail!("expected a group table, got {value}");
    };
    table
        .iter()
        .map(|(k, v)| Ok((k.clone(), text_list_key(v)?)))
        .collect()
}

/// Recursively load all `.toml` test-set files from a directory.
pub fn load_test_directory(dir: &Path) -> Result<Vec<TestSet>> {
    let mut sets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            sets.extend(load_test_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_test_set(&path) {
                Ok(set) => sets.push(set),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(sets)
}

/// A warning from test-set validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a test set for common authoring issues.
pub fn validate_test_set(set: &TestSet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Duplicate question IDs
    let mut seen_ids = std::collections::HashSet::new();
    for question in &set.questions {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: format!("duplicate question ID: {}", question.id),
            });
        }
    }

    for question in &set.questions {
        match &question.kind {
            QuestionKind::Unsupported => {
                warnings.push(ValidationWarning {
                    question_id: Some(question.id.clone()),
                    message: "unsupported question type, will always score zero".into(),
                });
            }
            QuestionKind::MultipleChoice {
                mode,
                answer,
                options,
            } => {
                if *mode == ChoiceMode::Single && answer.len() != 1 {
                    warnings.push(ValidationWarning {
                        question_id: Some(question.id.clone()),
                        message: format!(
                            "single-answer multiple_choice has {} key indices",
                            answer.len()
                        ),
                    });
                }
                if !options.is_empty() {
                    for index in answer.to_vec() {
                        if index as usize >= options.len() {
                            warnings.push(ValidationWarning {
                                question_id: Some(question.id.clone()),
                                message: format!(
                                    "key index {index} is outside the {} options",
                                    options.len()
                                ),
                            });
                        }
                    }
                }
            }
            QuestionKind::MatchingHeadings { answer, headings } => {
                if !headings.is_empty() {
                    for label in answer.values() {
                        if !headings.contains(label) {
                            warnings.push(ValidationWarning {
                                question_id: Some(question.id.clone()),
                                message: format!("heading label '{label}' is not in headings"),
                            });
                        }
                    }
                }
            }
            _ => {}
        }

        if !matches!(question.kind, QuestionKind::Unsupported)
            && question.kind.max_points() == 0
        {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: "answer key is empty".into(),
            });
        }
    }

    warnings
}
