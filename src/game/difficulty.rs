//! Difficulty tiers and the search limits and shortcuts each one uses.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("unknown difficulty {input:?}, expected easy, medium or hard")]
pub struct ParseDifficultyError {
    input: String,
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "easy" | "e" => Ok(Difficulty::Easy),
            "medium" | "m" => Ok(Difficulty::Medium),
            "hard" | "h" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError {
                input: input.to_string(),
            }),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        write!(f, "{}", name)
    }
}

/// How the hard tier answers an opponent's forced win by fours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VcfDefense {
    /// Depth of the scan for the opponent's sequence.
    pub depth: u8,
    /// Depth of the re-scan after blocking; the block is only played if it
    /// finds nothing.
    pub safety_depth: u8,
}

/// Static limits for one tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DifficultyProfile {
    /// Depth ceiling before the adaptive adjustment.
    pub max_depth: u8,
    pub time_budget: Duration,
    /// Depth of the engine's own VCF scan.
    pub vcf_depth: u8,
    pub vcf_defense: Option<VcfDefense>,
    pub vct_depth: Option<u8>,
    /// Run the open four and double four checks.
    pub shape_shortcuts: bool,
    /// Run the critical move check.
    pub critical_shortcut: bool,
    /// Run the winning combination check.
    pub combo_shortcut: bool,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                max_depth: 2,
                time_budget: Duration::from_millis(500),
                vcf_depth: 2,
                vcf_defense: None,
                vct_depth: None,
                shape_shortcuts: false,
                critical_shortcut: false,
                combo_shortcut: false,
            },
            Difficulty::Medium => DifficultyProfile {
                max_depth: 4,
                time_budget: Duration::from_millis(1500),
                vcf_depth: 6,
                vcf_defense: None,
                vct_depth: None,
                shape_shortcuts: true,
                critical_shortcut: true,
                combo_shortcut: false,
            },
            Difficulty::Hard => DifficultyProfile {
                max_depth: 6,
                time_budget: Duration::from_millis(3000),
                vcf_depth: 10,
                vcf_defense: Some(VcfDefense {
                    depth: 6,
                    safety_depth: 4,
                }),
                vct_depth: Some(4),
                shape_shortcuts: true,
                critical_shortcut: false,
                combo_shortcut: true,
            },
        }
    }
}

/// Depth ceiling adjusted for how crowded and how sharp the position is,
/// kept within `[max_depth - 2, max_depth + 3]` and never below 1.
pub fn adaptive_depth(max_depth: u8, stone_count: usize, active_threats: usize) -> u8 {
    let by_stones: i32 = match stone_count {
        0..=4 => -2,
        5..=10 => -1,
        11..=30 => 0,
        _ => 1,
    };
    let by_threats: i32 = match active_threats {
        0 => 0,
        1..=2 => 1,
        _ => 2,
    };

    let ceiling = max_depth as i32;
    let depth = (ceiling + by_stones + by_threats).clamp(ceiling - 2, ceiling + 3);
    depth.max(1) as u8
}
