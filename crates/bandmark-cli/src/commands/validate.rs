//! The `bandmark validate` command.

use std::path::PathBuf;

use anyhow::Result;

use bandmark_core::parser::validate_test_set;

pub fn execute(test_path: PathBuf) -> Result<()> {
    let sets = super::load_sets(&test_path)?;
    anyhow::ensure!(!sets.is_empty(), "no test sets found in {}", test_path.display());

    let mut warning_count = 0usize;
    for set in &sets {
        println!(
            "{} ({}): {} questions",
            set.name,
            set.id,
            set.questions.len()
        );

        for warning in validate_test_set(set) {
            warning_count += 1;
            match &warning.question_id {
                Some(id) => println!("  warning [{id}]: {}", warning.message),
                None => println!("  warning: {}", warning.message),
            }
        }
    }

    if warning_count == 0 {
        println!("All test sets valid");
    } else {
        println!("{warning_count} warning(s)");
    }

    Ok(())
}
