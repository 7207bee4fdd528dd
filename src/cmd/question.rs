//! Random question command: `interview-companion question`.

use anyhow::Result;

use interview_companion::config::AppConfig;
use interview_companion::questions::{QuestionBank, QuestionSource};
use interview_companion::ui;

pub fn cmd_question(config: &AppConfig) -> Result<()> {
    let bank = QuestionBank::from_config(&config.questions);
    println!("{}", ui::render_question(&bank.random_question()));
    Ok(())
}
