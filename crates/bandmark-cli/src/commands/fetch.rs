//! The `bandmark fetch` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use bandmark_client::config::{create_api, load_config_from};
use bandmark_core::engine::{AttemptEngine, AttemptEngineConfig};
use bandmark_core::model::Skill;

pub async fn execute(
    test_id: String,
    skill: String,
    parts: Vec<u32>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let skill: Skill = skill.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?;

    let config = load_config_from(config_path.as_deref())?;
    let api = create_api(&config)?;

    let engine = AttemptEngine::new(
        api,
        AttemptEngineConfig {
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            ..Default::default()
        },
    );

    let set = engine.fetch_merged(&test_id, skill, &parts).await?;

    let json = serde_json::to_string_pretty(&set)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, json)?;
            eprintln!(
                "Fetched {} question(s) to {}",
                set.questions.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}
