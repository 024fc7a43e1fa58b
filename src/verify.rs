// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Verification of an asset pack against the full resolvable path space.
//!
//! Every path the resolver can produce is enumerated by classifying the whole
//! input alphabet. Per-voice recordings (phonemes, vocals, noises) are
//! required; shared sfx are optional since the resolver falls back to them
//! only for symbols.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::classify::{classify, CharacterClass, TOKEN_BACKSPACE, TOKEN_TAB};
use crate::config::ALL_VOICES;
use crate::resolve::Resolver;

/// Severity level for a verification issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A single verification issue found during checking.
#[derive(Debug, Clone)]
pub struct Issue {
    pub severity: Severity,
    pub category: &'static str,
    pub message: String,
}

/// Result of verifying an asset pack.
#[derive(Debug, Clone, Default)]
pub struct VerificationReport {
    pub issues: Vec<Issue>,
}

impl VerificationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    /// Merge another report into this one.
    pub fn merge(&mut self, other: VerificationReport) {
        self.issues.extend(other.issues);
    }
}

/// Every token the system can receive: printable ASCII, newline, and the
/// control literals.
fn input_alphabet() -> Vec<String> {
    let mut tokens: Vec<String> = (b' '..=b'~').map(|b| (b as char).to_string()).collect();
    tokens.push("\n".to_string());
    tokens.push(TOKEN_TAB.to_string());
    tokens.push(TOKEN_BACKSPACE.to_string());
    tokens
}

/// Enumerates every path the resolver can produce over the input alphabet,
/// split into required (per-voice recordings) and optional (shared sfx).
fn expected_paths(asset_root: &Path) -> (BTreeSet<PathBuf>, BTreeSet<PathBuf>) {
    let resolver = Resolver::new(asset_root);
    let mut required = BTreeSet::new();
    let mut optional = BTreeSet::new();

    for token in input_alphabet() {
        // Both flag states, so voiced punctuation and its symbolic fallback
        // are each covered.
        for flag in [true, false] {
            let class = classify(&token, flag);
            match class {
                CharacterClass::Alphabetical(_)
                | CharacterClass::Harmonic(_)
                | CharacterClass::VoicedPunctuation(_) => {
                    for voice in ALL_VOICES {
                        required.insert(resolver.path_for_class(class, voice));
                    }
                }
                _ => {
                    optional.insert(resolver.path_for_class(class, ALL_VOICES[0]));
                }
            }
        }
    }
    (required, optional)
}

/// Checks that every resolvable asset exists beneath the asset root.
/// Missing per-voice recordings are errors; missing shared sfx are warnings.
pub fn verify_assets(asset_root: &Path) -> VerificationReport {
    let mut report = VerificationReport::default();

    if !asset_root.is_dir() {
        report.issues.push(Issue {
            severity: Severity::Error,
            category: "asset-root",
            message: format!("asset root {} is not a directory", asset_root.display()),
        });
        return report;
    }

    let (required, optional) = expected_paths(asset_root);
    for path in required {
        if !path.is_file() {
            report.issues.push(Issue {
                severity: Severity::Error,
                category: "voice-assets",
                message: format!("missing {}", path.display()),
            });
        }
    }
    for path in optional {
        if !path.is_file() {
            report.issues.push(Issue {
                severity: Severity::Warning,
                category: "sfx-assets",
                message: format!("missing {}", path.display()),
            });
        }
    }
    report
}

/// Prints a verification report grouped by category.
pub fn print_report(report: &VerificationReport) {
    if report.is_clean() {
        println!("\u{2705} Asset pack passed verification.");
        return;
    }

    // Group issues by category.
    let mut by_category: BTreeMap<&str, Vec<&Issue>> = BTreeMap::new();
    for issue in &report.issues {
        by_category.entry(issue.category).or_default().push(issue);
    }

    for (category, issues) in &by_category {
        let has_errors = issues.iter().any(|i| i.severity == Severity::Error);
        let icon = if has_errors {
            "\u{274c}"
        } else {
            "\u{26a0}\u{fe0f} "
        };
        println!("{} {}", icon, category);
        for issue in issues {
            let severity_icon = match issue.severity {
                Severity::Warning => "\u{26a0}\u{fe0f} ",
                Severity::Error => "\u{274c}",
            };
            println!("   {} {}", severity_icon, issue.message);
        }
    }

    println!(
        "\nSummary: {} issue(s) found across {} categor(ies).",
        report.issues.len(),
        by_category.len()
    );
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::testutil::write_wav;

    /// Builds a complete asset pack in a temp directory.
    fn complete_pack() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("unable to create temp dir");
        let (required, optional) = expected_paths(dir.path());
        for path in required.iter().chain(optional.iter()) {
            fs::create_dir_all(path.parent().expect("path has no parent"))
                .expect("unable to create dirs");
            write_wav(path, &[0.5f32; 16], 1, 44100);
        }
        dir
    }

    #[test]
    fn test_complete_pack_is_clean() {
        let dir = complete_pack();
        let report = verify_assets(dir.path());
        assert!(report.is_clean());
        assert!(!report.has_errors());
    }

    #[test]
    fn test_missing_voice_asset_is_an_error() {
        let dir = complete_pack();
        fs::remove_file(
            dir.path()
                .join("audio/animalese/female/voice_1/a.wav"),
        )
        .expect("unable to remove file");

        let report = verify_assets(dir.path());
        assert!(report.has_errors());
        assert!(report
            .issues
            .iter()
            .any(|i| i.category == "voice-assets" && i.message.contains("a.wav")));
    }

    #[test]
    fn test_missing_sfx_is_a_warning() {
        let dir = complete_pack();
        fs::remove_file(dir.path().join("audio/sfx/tilde.wav")).expect("unable to remove file");

        let report = verify_assets(dir.path());
        assert!(!report.is_clean());
        assert!(!report.has_errors());
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let report = verify_assets(Path::new("/nonexistent/assets"));
        assert!(report.has_errors());
        assert_eq!(report.issues[0].category, "asset-root");
    }

    #[test]
    fn test_expected_paths_cover_all_voices() {
        let (required, _) = expected_paths(Path::new("/assets"));
        // 52 letters + 12 vocals + 3 noises, each across 8 voices.
        assert_eq!(required.len(), (52 + 12 + 3) * 8);
    }

    #[test]
    fn test_report_merge() {
        let mut a = VerificationReport::default();
        a.issues.push(Issue {
            severity: Severity::Warning,
            category: "sfx-assets",
            message: "missing tilde".to_string(),
        });
        let mut b = VerificationReport::default();
        b.issues.push(Issue {
            severity: Severity::Error,
            category: "voice-assets",
            message: "missing a".to_string(),
        });
        a.merge(b);
        assert_eq!(a.issues.len(), 2);
        assert!(a.has_errors());
    }
}
