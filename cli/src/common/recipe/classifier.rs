//! # Command Classifier (`common::recipe::classifier`)
//!
//! File: cli/src/common/recipe/classifier.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Decides which toolchain produced a single line of shell text. The decision
//! is driven by `CLASSIFICATION_RULES`, an ordered table evaluated first-match-wins:
//!
//! | # | Pattern              | Result   |
//! |---|----------------------|----------|
//! | 1 | blank line           | `None`   |
//! | 2 | `make`               | `CCpp`   |
//! | 3 | `ninja`              | `CCpp`   |
//! | 4 | `Build`              | `CCpp`   |
//! | 5 | `autogen`            | `CCpp`   |
//! | 6 | `python` … `setup.py`| `Python` |
//! |   | anything else        | `Unknown`|
//!
//! The patterns are coarse substring matches. `cmake`, `meson compile -C Build`
//! and `python setup.py build_ext && make` all land on `CCpp`; a line mentioning
//! both a C build driver and `setup.py` always resolves to `CCpp` because the C
//! rules come first. That is a known limitation of the heuristic, and the table
//! is public so callers and tests can see exactly what is matched.
//!
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Toolchain classification of one recipe line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifiedCommand {
    /// No command at all (blank line).
    None,
    /// C/C++ family build driver.
    CCpp,
    /// Python packaging invocation.
    Python,
    /// A command, but not one we know how to wrap.
    Unknown,
}

impl ClassifiedCommand {
    /// Value for the analysis tool's `--language` flag, if the class has one.
    pub fn language(self) -> Option<&'static str> {
        match self {
            ClassifiedCommand::CCpp => Some("cpp"),
            ClassifiedCommand::Python => Some("python"),
            ClassifiedCommand::None | ClassifiedCommand::Unknown => None,
        }
    }
}

impl fmt::Display for ClassifiedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ClassifiedCommand::None => "no command",
            ClassifiedCommand::CCpp => "C/C++",
            ClassifiedCommand::Python => "Python",
            ClassifiedCommand::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// One row of the classification table.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub pattern: &'static str,
    pub result: ClassifiedCommand,
}

/// Ordered rules; the first matching pattern decides the classification.
pub const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        pattern: r"^\s*$",
        result: ClassifiedCommand::None,
    },
    ClassificationRule {
        pattern: r"make",
        result: ClassifiedCommand::CCpp,
    },
    ClassificationRule {
        pattern: r"ninja",
        result: ClassifiedCommand::CCpp,
    },
    ClassificationRule {
        pattern: r"Build",
        result: ClassifiedCommand::CCpp,
    },
    ClassificationRule {
        pattern: r"autogen",
        result: ClassifiedCommand::CCpp,
    },
    ClassificationRule {
        pattern: r"python.*setup\.py",
        result: ClassifiedCommand::Python,
    },
];

static COMPILED_RULES: LazyLock<Vec<(Regex, ClassifiedCommand)>> = LazyLock::new(|| {
    CLASSIFICATION_RULES
        .iter()
        .map(|rule| {
            let regex = Regex::new(rule.pattern).expect("built-in classification pattern is valid");
            (regex, rule.result)
        })
        .collect()
});

/// Classifies one line of shell text. Deterministic for a given input.
pub fn classify(line: &str) -> ClassifiedCommand {
    COMPILED_RULES
        .iter()
        .find(|(regex, _)| regex.is_match(line))
        .map(|(_, result)| *result)
        .unwrap_or(ClassifiedCommand::Unknown)
}
