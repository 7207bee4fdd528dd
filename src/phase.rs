//! Note sections and the phase gate.
//!
//! This module provides:
//! - `NoteSection`, the six note categories a candidate fills in
//! - `Notes`, the fixed six-key notes record
//! - Gate functions deriving the current phase and per-phase accessibility
//! - `PhaseStatus`, a serializable snapshot of the gate for clients
//!
//! Five sections are gated and must be completed in order. Resource estimation
//! is a scratchpad and is never locked.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the six note categories.
///
/// Variant order is display order; `Ord` is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoteSection {
    ResourceEstimation,
    Assumptions,
    FunctionalRequirements,
    NonFunctionalRequirements,
    HighLevelDesign,
    DeepDive,
}

/// The gated phases, in unlock order. Index 0 here is phase 1.
pub const GATED_PHASES: [NoteSection; 5] = [
    NoteSection::Assumptions,
    NoteSection::FunctionalRequirements,
    NoteSection::NonFunctionalRequirements,
    NoteSection::HighLevelDesign,
    NoteSection::DeepDive,
];

/// Number of gated phases; also the highest value `current_phase` returns.
pub const PHASE_COUNT: usize = GATED_PHASES.len();

impl NoteSection {
    pub const ALL: [NoteSection; 6] = [
        NoteSection::ResourceEstimation,
        NoteSection::Assumptions,
        NoteSection::FunctionalRequirements,
        NoteSection::NonFunctionalRequirements,
        NoteSection::HighLevelDesign,
        NoteSection::DeepDive,
    ];

    /// Wire key, as used in JSON bodies and URL paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResourceEstimation => "resourceEstimation",
            Self::Assumptions => "assumptions",
            Self::FunctionalRequirements => "functionalRequirements",
            Self::NonFunctionalRequirements => "nonFunctionalRequirements",
            Self::HighLevelDesign => "highLevelDesign",
            Self::DeepDive => "deepDive",
        }
    }

    /// Human-readable label. Evaluations are keyed by this label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ResourceEstimation => "Resource Estimation",
            Self::Assumptions => "Assumptions",
            Self::FunctionalRequirements => "Functional Requirements",
            Self::NonFunctionalRequirements => "Non-Functional Requirements",
            Self::HighLevelDesign => "High-Level Design",
            Self::DeepDive => "Deep Dive",
        }
    }

    /// 1-based gate index, or `None` for the ungated scratchpad.
    pub fn phase_index(&self) -> Option<usize> {
        GATED_PHASES
            .iter()
            .position(|s| s == self)
            .map(|pos| pos + 1)
    }

    /// Section for a 1-based gate index.
    pub fn from_phase_index(index: usize) -> Option<Self> {
        index
            .checked_sub(1)
            .and_then(|i| GATED_PHASES.get(i))
            .copied()
    }
}

impl std::fmt::Display for NoteSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for NoteSection {
    type Err = String;

    /// Accepts the camelCase wire key, or the kebab/snake spelling used on the
    /// command line (`high-level-design`, `deep_dive`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        NoteSection::ALL
            .into_iter()
            .find(|section| section.as_str().to_lowercase() == normalized)
            .ok_or_else(|| {
                format!(
                    "Invalid section '{}'. Valid values: {}",
                    s,
                    NoteSection::ALL.map(|s| s.as_str()).join(", ")
                )
            })
    }
}

/// Notes for one session. Every section is always present; only content
/// changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notes {
    pub resource_estimation: String,
    pub assumptions: String,
    pub functional_requirements: String,
    pub non_functional_requirements: String,
    pub high_level_design: String,
    pub deep_dive: String,
}

impl Notes {
    pub fn get(&self, section: NoteSection) -> &str {
        match section {
            NoteSection::ResourceEstimation => &self.resource_estimation,
            NoteSection::Assumptions => &self.assumptions,
            NoteSection::FunctionalRequirements => &self.functional_requirements,
            NoteSection::NonFunctionalRequirements => &self.non_functional_requirements,
            NoteSection::HighLevelDesign => &self.high_level_design,
            NoteSection::DeepDive => &self.deep_dive,
        }
    }

    pub fn set(&mut self, section: NoteSection, content: impl Into<String>) {
        let slot = match section {
            NoteSection::ResourceEstimation => &mut self.resource_estimation,
            NoteSection::Assumptions => &mut self.assumptions,
            NoteSection::FunctionalRequirements => &mut self.functional_requirements,
            NoteSection::NonFunctionalRequirements => &mut self.non_functional_requirements,
            NoteSection::HighLevelDesign => &mut self.high_level_design,
            NoteSection::DeepDive => &mut self.deep_dive,
        };
        *slot = content.into();
    }
}

// ── Gate ──────────────────────────────────────────────────────────────

/// True iff the trimmed content for `section` is non-empty.
pub fn is_complete(notes: &Notes, section: NoteSection) -> bool {
    !notes.get(section).trim().is_empty()
}

/// 1-based index of the first incomplete gated phase.
///
/// Capped at `PHASE_COUNT`: once every phase is complete this still returns 5,
/// the same value as "phase 5 in progress". Use `all_complete` to tell the two
/// apart.
pub fn current_phase(notes: &Notes) -> usize {
    GATED_PHASES
        .iter()
        .position(|section| !is_complete(notes, *section))
        .map(|pos| pos + 1)
        .unwrap_or(PHASE_COUNT)
}

/// Whether gated phase `index` (1-based) may be edited or evaluated.
pub fn is_accessible(notes: &Notes, index: usize) -> bool {
    debug_assert!(
        (1..=PHASE_COUNT).contains(&index),
        "phase index {} out of range 1..={}",
        index,
        PHASE_COUNT
    );
    (1..=PHASE_COUNT).contains(&index) && index <= current_phase(notes)
}

/// Section-level accessibility. Resource estimation is always open.
pub fn is_section_accessible(notes: &Notes, section: NoteSection) -> bool {
    match section.phase_index() {
        Some(index) => is_accessible(notes, index),
        None => true,
    }
}

pub fn all_complete(notes: &Notes) -> bool {
    GATED_PHASES
        .iter()
        .all(|section| is_complete(notes, *section))
}

/// Gate state for one gated phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseState {
    pub index: usize,
    pub section: NoteSection,
    pub label: String,
    pub complete: bool,
    pub accessible: bool,
}

/// Serializable view of the gate, shipped with every session snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseStatus {
    pub current_phase: usize,
    pub all_complete: bool,
    pub phases: Vec<PhaseState>,
}

impl PhaseStatus {
    pub fn from_notes(notes: &Notes) -> Self {
        let phases = GATED_PHASES
            .iter()
            .enumerate()
            .map(|(i, section)| PhaseState {
                index: i + 1,
                section: *section,
                label: section.label().to_string(),
                complete: is_complete(notes, *section),
                accessible: is_accessible(notes, i + 1),
            })
            .collect();
        Self {
            current_phase: current_phase(notes),
            all_complete: all_complete(notes),
            phases,
        }
    }
}
