use crate::models::conflict::{LocaleFinding, LocaleIssue};
use crate::models::paths::LOCALIZATION_ROOT;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Share of differing lines below which a translation counts as an untouched copy.
const IDENTICAL_THRESHOLD: f64 = 0.1;

#[derive(Clone, Debug)]
pub struct LocaleRules {
    pub source: String,
    pub required: String,
}

impl LocaleRules {
    pub fn new(source: impl Into<String>, required: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            required: required.into(),
        }
    }

    fn suffix(locale: &str) -> String {
        format!("_l_{locale}.yml")
    }
}

/// Reports a package whose localization root lacks the required locale folder.
pub fn check_required_locale(folder: &Utf8Path, rules: &LocaleRules) -> Option<LocaleFinding> {
    let dir = folder.join(LOCALIZATION_ROOT).join(&rules.required);
    if dir.is_dir() {
        return None;
    }
    Some(LocaleFinding {
        issue: LocaleIssue::MissingLocale,
        file: format!("{LOCALIZATION_ROOT}/{}", rules.required),
    })
}

/// Compares every source-locale file of a package with its required-locale counterpart.
/// Packages missing either locale folder are left to [`check_required_locale`].
pub fn audit_translations(folder: &Utf8Path, rules: &LocaleRules) -> Vec<LocaleFinding> {
    let root = folder.join(LOCALIZATION_ROOT);
    let source_dir = root.join(&rules.source);
    let target_dir = root.join(&rules.required);
    if !source_dir.is_dir() || !target_dir.is_dir() {
        return Vec::new();
    }

    let source_suffix = LocaleRules::suffix(&rules.source);
    let target_suffix = LocaleRules::suffix(&rules.required);
    let mut findings = Vec::new();

    for source in source_files(&source_dir, &source_suffix) {
        let Ok(rel) = source.strip_prefix(&source_dir) else {
            continue;
        };
        let Some(stem) = rel.as_str().strip_suffix(&source_suffix) else {
            continue;
        };
        let target_rel = format!("{stem}{target_suffix}");
        let target = target_dir.join(&target_rel);

        if !target.is_file() {
            findings.push(LocaleFinding {
                issue: LocaleIssue::MissingTranslation,
                file: rel.to_string(),
            });
            continue;
        }

        let (Some(src_text), Some(dst_text)) = (read_text(&source), read_text(&target)) else {
            continue;
        };
        if let Some(issue) = compare_contents(&src_text, &dst_text) {
            findings.push(LocaleFinding {
                issue,
                file: target_rel,
            });
        }
    }

    findings.sort();
    findings
}

fn source_files(dir: &Utf8Path, suffix: &str) -> Vec<Utf8PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| Utf8PathBuf::from_path_buf(e.into_path()).ok())
        .filter(|p| p.file_name().is_some_and(|n| n.ends_with(suffix)))
        .collect()
}

fn read_text(path: &Utf8Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            Some(text.trim_start_matches('\u{feff}').to_string())
        }
        Err(e) => {
            warn!("Unable to read {path}: {e}");
            None
        }
    }
}

/// Line-by-line comparison of a source file and its translation.
pub fn compare_contents(source: &str, translated: &str) -> Option<LocaleIssue> {
    let source_lines: Vec<&str> = source.split('\n').collect();
    let translated_lines: Vec<&str> = translated.split('\n').collect();

    if source_lines.len() != translated_lines.len() {
        return Some(LocaleIssue::LineCountMismatch);
    }

    let different = source_lines
        .iter()
        .zip(&translated_lines)
        .filter(|(a, b)| a.trim() != b.trim())
        .count();
    let ratio = different as f64 / source_lines.len() as f64;
    debug!("{different} of {} lines differ", source_lines.len());

    (ratio < IDENTICAL_THRESHOLD).then_some(LocaleIssue::IdenticalContent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_contents() {
        assert_eq!(
            compare_contents("a\nb\nc", "a\nb"),
            Some(LocaleIssue::LineCountMismatch)
        );
        assert_eq!(
            compare_contents("l_english:\n key: \"Hello\"\n", "l_english:\n  key: \"Hello\"  \n"),
            Some(LocaleIssue::IdenticalContent)
        );
        assert_eq!(
            compare_contents("l_english:\n key: \"Hello\"\n", "l_russian:\n key: \"Привет\"\n"),
            None
        );
    }

    #[test]
    fn test_audit_finds_missing_and_copied_files() {
        let tmp = tempfile::tempdir().unwrap();
        let folder = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        let en = folder.join("localization/english");
        let ru = folder.join("localization/russian");
        std::fs::create_dir_all(&en).unwrap();
        std::fs::create_dir_all(&ru).unwrap();

        std::fs::write(en.join("events_l_english.yml"), "l_english:\n a: \"A\"\n").unwrap();
        std::fs::write(en.join("traits_l_english.yml"), "l_english:\n t: \"T\"\n").unwrap();
        std::fs::write(ru.join("traits_l_russian.yml"), "\u{feff}l_english:\n t: \"T\"\n").unwrap();

        let rules = LocaleRules::new("english", "russian");
        assert_eq!(check_required_locale(&folder, &rules), None);
        assert_eq!(
            audit_translations(&folder, &rules),
            vec![
                LocaleFinding {
                    issue: LocaleIssue::MissingTranslation,
                    file: "events_l_english.yml".into(),
                },
                LocaleFinding {
                    issue: LocaleIssue::IdenticalContent,
                    file: "traits_l_russian.yml".into(),
                },
            ]
        );
    }
}
