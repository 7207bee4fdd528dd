//! Terminal rendering for the interview client.
//!
//! Functions here build strings rather than printing, so commands decide
//! where output goes and tests can inspect it.

pub mod icons;

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::phase::{NoteSection, PhaseStatus};
use crate::session::{Evaluation, SessionSnapshot};
use icons::{BULB, CHECK, LOCK, PENCIL, QUESTION, STAR};

const WRAP_WIDTH: usize = 80;

/// Wrap `text` for the terminal, indenting every line by `indent` spaces.
pub fn wrap(text: &str, indent: usize) -> String {
    let pad = " ".repeat(indent);
    let options = textwrap::Options::new(WRAP_WIDTH)
        .initial_indent(&pad)
        .subsequent_indent(&pad);
    textwrap::fill(text, options)
}

pub fn render_question(question: &str) -> String {
    format!(
        "{}{}\n{}",
        QUESTION,
        style("Interview question").bold(),
        wrap(question, 2)
    )
}

/// One line per gated phase, marking complete, current, and locked phases.
pub fn render_phase_status(status: &PhaseStatus) -> String {
    let mut lines = vec![format!(
        "{} (always open)",
        style(NoteSection::ResourceEstimation.label()).dim()
    )];

    for phase in &status.phases {
        let marker = if phase.complete {
            format!("{}", CHECK)
        } else if phase.accessible {
            format!("{}", PENCIL)
        } else {
            format!("{}", LOCK)
        };
        let label = if phase.index == status.current_phase && !status.all_complete {
            style(format!("{}. {}", phase.index, phase.label))
                .cyan()
                .bold()
                .to_string()
        } else if phase.accessible {
            format!("{}. {}", phase.index, phase.label)
        } else {
            style(format!("{}. {}", phase.index, phase.label))
                .dim()
                .to_string()
        };
        lines.push(format!("{}{}", marker, label));
    }

    if status.all_complete {
        lines.push(style("All phases complete.").green().to_string());
    }
    lines.join("\n")
}

pub fn render_score(score: Option<u8>) -> String {
    match score {
        Some(score) => format!("{}{}/5", STAR, style(score).yellow().bold()),
        None => style("(no score)").dim().to_string(),
    }
}

pub fn render_evaluation(evaluation: &Evaluation) -> String {
    format!(
        "{} {} {}\n{}",
        style(&evaluation.section).bold(),
        render_score(evaluation.score),
        style(evaluation.timestamp.format("%Y-%m-%d %H:%M UTC")).dim(),
        wrap(&evaluation.feedback, 2)
    )
}

pub fn render_hint(section: NoteSection, hint: &str) -> String {
    format!(
        "{}{} {}\n{}",
        BULB,
        style("Hint for").bold(),
        style(section.label()).bold(),
        wrap(hint, 2)
    )
}

/// Full status view: question, gate, notes summary, evaluations.
pub fn render_snapshot(snapshot: &SessionSnapshot) -> String {
    let mut out = Vec::new();
    out.push(render_question(&snapshot.question));
    out.push(format!(
        "{} {}",
        style("Session").dim(),
        style(&snapshot.session_id).dim()
    ));
    out.push(String::new());
    out.push(render_phase_status(&snapshot.phase_status));

    let filled: Vec<String> = NoteSection::ALL
        .iter()
        .filter_map(|section| {
            let content = snapshot.notes.get(*section).trim();
            (!content.is_empty()).then(|| {
                format!(
                    "{}\n{}",
                    style(section.label()).underlined(),
                    wrap(content, 2)
                )
            })
        })
        .collect();
    if !filled.is_empty() {
        out.push(String::new());
        out.push(style("Notes").bold().to_string());
        out.extend(filled);
    }

    if !snapshot.evaluations.is_empty() {
        out.push(String::new());
        out.push(style("Evaluations").bold().to_string());
        out.extend(snapshot.evaluations.iter().map(render_evaluation));
    }
    out.join("\n")
}

/// Spinner shown while waiting on the server.
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        bar.set_style(spinner_style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Notes;
    use crate::session::Session;

    fn plain(s: &str) -> String {
        console::strip_ansi_codes(s).to_string()
    }

    #[test]
    fn test_wrap_indents_every_line() {
        let text = "word ".repeat(40);
        let wrapped = wrap(&text, 2);
        assert!(wrapped.lines().count() > 1);
        assert!(wrapped.lines().all(|l| l.starts_with("  ") && l.len() <= WRAP_WIDTH));
    }

    #[test]
    fn test_phase_status_marks_locked_phases() {
        let mut notes = Notes::default();
        notes.set(NoteSection::Assumptions, "1M DAU");
        let rendered = plain(&render_phase_status(&PhaseStatus::from_notes(&notes)));

        assert!(rendered.contains("Resource Estimation (always open)"));
        assert!(rendered.contains("1. Assumptions"));
        assert!(rendered.contains("2. Functional Requirements"));
        assert!(!rendered.contains("All phases complete."));
    }

    #[test]
    fn test_phase_status_all_complete() {
        let mut notes = Notes::default();
        for section in crate::phase::GATED_PHASES {
            notes.set(section, "done");
        }
        let rendered = plain(&render_phase_status(&PhaseStatus::from_notes(&notes)));
        assert!(rendered.contains("All phases complete."));
    }

    #[test]
    fn test_render_score() {
        assert!(plain(&render_score(Some(4))).contains("4/5"));
        assert_eq!(plain(&render_score(None)), "(no score)");
    }

    #[test]
    fn test_snapshot_lists_notes_and_evaluations() {
        let mut session = Session::new("Design a URL shortener".into());
        session.set_note(NoteSection::Assumptions, "read heavy");
        session.record_evaluation(
            NoteSection::Assumptions,
            Evaluation::new(NoteSection::Assumptions, "Good.".into(), Some(3)),
        );
        let rendered = plain(&render_snapshot(&session.snapshot()));

        assert!(rendered.contains("Design a URL shortener"));
        assert!(rendered.contains("read heavy"));
        assert!(rendered.contains("Evaluations"));
        assert!(rendered.contains("3/5"));
    }

    #[test]
    fn test_render_hint() {
        let rendered = plain(&render_hint(NoteSection::DeepDive, "Consider hot keys."));
        assert!(rendered.contains("Hint for Deep Dive"));
        assert!(rendered.contains("Consider hot keys."));
    }
}
