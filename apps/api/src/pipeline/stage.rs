//! Stage definitions and the run-scoped output map.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Identifier of one pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageName {
    Recruiter,
    Candidate,
    Interview,
    Answer,
}

impl StageName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageName::Recruiter => "recruiter",
            StageName::Candidate => "candidate",
            StageName::Interview => "interview",
            StageName::Answer => "answer",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request-level inputs every template may read. Fixed for the whole run.
#[derive(Debug, Clone, Default)]
pub struct StaticArgs {
    pub recruiter_text: String,
    pub resume_text: String,
    pub github_url: String,
    /// Formatted GitHub profile, or the fallback line when the fetch failed.
    pub github_profile: String,
    pub job_description: String,
}

/// The outputs a template is allowed to see: exactly its declared dependencies.
#[derive(Debug, Clone, Default)]
pub struct StageInputs<'a> {
    outputs: BTreeMap<StageName, &'a str>,
}

impl<'a> StageInputs<'a> {
    pub fn get(&self, stage: StageName) -> Option<&'a str> {
        self.outputs.get(&stage).copied()
    }

    /// Output of `stage`, or "" if it is not visible to this template.
    pub fn text(&self, stage: StageName) -> &'a str {
        self.get(stage).unwrap_or("")
    }

    /// Visible stage names in sorted identifier order.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.outputs.keys().map(StageName::as_str).collect();
        names.sort_unstable();
        names
    }
}

pub type PromptTemplate = fn(&StageInputs<'_>, &StaticArgs) -> String;

/// Static definition of one stage. Built once at startup, never mutated.
#[derive(Clone)]
pub struct StageSpec {
    pub name: StageName,
    pub dependencies: Vec<StageName>,
    pub template: PromptTemplate,
    /// Persona system prompt sent alongside the rendered template.
    pub system: String,
}

impl StageSpec {
    pub fn render(&self, prior: &StageOutputs, args: &StaticArgs) -> String {
        (self.template)(&prior.restricted_to(&self.dependencies), args)
    }
}

impl fmt::Debug for StageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageSpec")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// Stage outputs of a single run. Append-only; a fresh one per run.
#[derive(Debug, Clone, Default)]
pub struct StageOutputs {
    outputs: BTreeMap<StageName, String>,
}

impl StageOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a stage's output. The first write wins; returns false on a repeat.
    pub fn record(&mut self, stage: StageName, text: String) -> bool {
        if self.outputs.contains_key(&stage) {
            return false;
        }
        self.outputs.insert(stage, text);
        true
    }

    pub fn get(&self, stage: StageName) -> Option<&str> {
        self.outputs.get(&stage).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn restricted_to(&self, dependencies: &[StageName]) -> StageInputs<'_> {
        StageInputs {
            outputs: dependencies
                .iter()
                .filter_map(|dep| self.outputs.get(dep).map(|text| (*dep, text.as_str())))
                .collect(),
        }
    }
}
