//! Post-hoc strength scoring

use serde::Serialize;

/// Characters the symbol check accepts. `-` is not among them.
const SCORED_SYMBOLS: &[u8] = b"!@#$%^&*()[]{}+=<>?~`|:;,._";

/// Runs of this many identical characters fail the repetition check
const REPEAT_RUN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StrengthLabel {
    Weak,
    Medium,
    Strong,
}

impl StrengthLabel {
    pub fn from_score(score: u8) -> Self {
        if score >= 5 {
            StrengthLabel::Strong
        } else if score >= 3 {
            StrengthLabel::Medium
        } else {
            StrengthLabel::Weak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrengthLabel::Weak => "Weak",
            StrengthLabel::Medium => "Medium",
            StrengthLabel::Strong => "Strong",
        }
    }
}

/// Individual rule results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StrengthChecks {
    pub length: bool,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digits: bool,
    pub symbols: bool,
    pub no_repeating: bool,
}

impl StrengthChecks {
    pub fn score(&self) -> u8 {
        [
            self.length,
            self.uppercase,
            self.lowercase,
            self.digits,
            self.symbols,
            self.no_repeating,
        ]
        .iter()
        .filter(|passed| **passed)
        .count() as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrengthReport {
    /// Number of passed checks (0-6)
    pub score: u8,
    pub label: StrengthLabel,
    pub checks: StrengthChecks,
    /// One hint per failed check
    pub feedback: Vec<&'static str>,
}

/// Score a password against the six rules
pub fn validate_strength(password: &str) -> StrengthReport {
    let checks = StrengthChecks {
        length: password.chars().count() >= 8,
        uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
        lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
        digits: password.chars().any(|c| c.is_ascii_digit()),
        symbols: password.bytes().any(|b| SCORED_SYMBOLS.contains(&b)),
        no_repeating: !has_repeat_run(password, REPEAT_RUN),
    };
    let score = checks.score();

    StrengthReport {
        score,
        label: StrengthLabel::from_score(score),
        checks,
        feedback: feedback_for(&checks),
    }
}

fn has_repeat_run(password: &str, run: usize) -> bool {
    let mut last = None;
    let mut count = 0;
    for c in password.chars() {
        if Some(c) == last {
            count += 1;
        } else {
            last = Some(c);
            count = 1;
        }
        if count >= run {
            return true;
        }
    }
    false
}

fn feedback_for(checks: &StrengthChecks) -> Vec<&'static str> {
    let rules = [
        (checks.length, "Use at least 8 characters"),
        (checks.uppercase, "Add uppercase letters"),
        (checks.lowercase, "Add lowercase letters"),
        (checks.digits, "Add numbers"),
        (checks.symbols, "Add symbols"),
        (checks.no_repeating, "Avoid repeating characters"),
    ];
    rules
        .iter()
        .filter(|(passed, _)| !passed)
        .map(|(_, hint)| *hint)
        .collect()
}
