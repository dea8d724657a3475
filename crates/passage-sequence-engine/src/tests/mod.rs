use crate::editing::{BreakpointCollection, PassageSink, ValidationReport};
use crate::models::{Command, CommandContent, Passage};

/// Dialog command with the given text and no speaker
pub fn dialog(text: &str) -> Command {
    Command::with_content(CommandContent::Dialog {
        speaker: None,
        text: text.to_string(),
    })
}

pub fn commands(texts: &[&str]) -> Vec<Command> {
    texts.iter().map(|text| dialog(text)).collect()
}

pub fn summaries(commands: &[Command]) -> Vec<String> {
    commands.iter().map(|c| c.content.summary()).collect()
}

pub fn slot_names(breakpoints: &BreakpointCollection, slot: usize) -> Vec<String> {
    breakpoints
        .get_breakpoints(slot)
        .iter()
        .map(|bp| bp.name.clone())
        .collect()
}

/// Sink that keeps every snapshot and report it receives
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub persisted: Vec<Passage>,
    pub reports: Vec<ValidationReport>,
}

impl RecordingSink {
    pub fn last(&self) -> &Passage {
        self.persisted.last().expect("nothing persisted yet")
    }

    pub fn last_report(&self) -> &ValidationReport {
        self.reports.last().expect("nothing reported yet")
    }
}

impl PassageSink for RecordingSink {
    fn persist(&mut self, passage: &Passage) {
        self.persisted.push(passage.clone());
    }

    fn report_validation(&mut self, report: &ValidationReport) {
        self.reports.push(report.clone());
    }
}
