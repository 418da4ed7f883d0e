//! The `bandmark init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create bandmark.toml
    if std::path::Path::new("bandmark.toml").exists() {
        println!("bandmark.toml already exists, skipping.");
    } else {
        std::fs::write("bandmark.toml", SAMPLE_CONFIG)?;
        println!("Created bandmark.toml");
    }

    // Create example test set and answers
    std::fs::create_dir_all("testsets")?;
    let example_path = std::path::Path::new("testsets/example.toml");
    if example_path.exists() {
        println!("testsets/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_TEST_SET)?;
        println!("Created testsets/example.toml");
    }

    let answers_path = std::path::Path::new("testsets/example-answers.json");
    if answers_path.exists() {
        println!("testsets/example-answers.json already exists, skipping.");
    } else {
        std::fs::write(answers_path, EXAMPLE_ANSWERS)?;
        println!("Created testsets/example-answers.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: bandmark validate --test testsets/example.toml");
    println!("  2. Run: bandmark score --test testsets/example.toml --answers testsets/example-answers.json");
    println!("  3. Edit bandmark.toml to connect a remote exam service");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# bandmark configuration

# Aggregate policy: "per_question" or "partial_credit"
default_policy = "per_question"
max_retries = 3
retry_delay_ms = 1000
output_dir = "./bandmark-results"

# Uncomment to connect a remote exam service:
# [api]
# base_url = "https://exams.example.com"
# api_key = "${BANDMARK_API_KEY}"
"#;

const EXAMPLE_TEST_SET: &str = r#"[test_set]
id = "example-reading-1"
name = "Example Reading Part 1"
description = "A short mixed-type reading part to get started"
skill = "reading"
part = 1

[[questions]]
id = "q1"
type = "true_false_not_given"
text = "The harbour was built before the Roman period."
answer = "NOT GIVEN"

[[questions]]
id = "q2"
type = "multiple_choice"
text = "What does the writer say about coastal trade?"
answer = 1
options = [
  "It declined steadily",
  "It depended on seasonal winds",
  "It was limited to luxury goods",
  "It required royal approval",
]

[[questions]]
id = "q3"
type = "sentence_completion"
text = "Most cargo vessels were loaded with ____."
answer = "timber"
word_limit = 1

[[questions]]
id = "q4"
type = "summary_completion"
text = "Complete the summary of paragraph C."
answer = ["sediment", "erosion"]

[[questions]]
id = "q5"
type = "matching_headings"
headings = ["i", "ii", "iii", "iv", "v"]

[questions.answer]
A = "iii"
B = "v"
"#;

const EXAMPLE_ANSWERS: &str = r#"[
  { "questionId": "q1", "answer": "NOT GIVEN" },
  { "questionId": "q2", "answer": 1 },
  { "questionId": "q3", "answer": " Timber " },
  { "questionId": "q4", "answer": ["sediment", "deposit"] },
  { "questionId": "q5", "answer": { "A": "iii", "B": "iv" } }
]
"#;
