use std::fs;
use std::path::Path;

use scribe_consolidate::Language;
use scribe_data::{FormattedOutput, discover_jobs, run_batch, run_job};
use scribe_json::LoadMode;
use scribe_types::WordKind;
use serde_json::Value;

fn write_queried(root: &Path, language: &str, kind: WordKind, body: &str) {
    let dir = root.join(language).join(kind.as_str());
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(kind.queried_file_name()), body).unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn seed(root: &Path) {
    write_queried(
        root,
        "German",
        WordKind::Nouns,
        r#"[
  {"singular": "Wort", "plural": "Wörter", "gender": "neuter"},
  {"singular": "Wort", "plural": "Worte"},
  {"plural": "Leute"}
]"#,
    );
    write_queried(
        root,
        "German",
        WordKind::Verbs,
        r#"[
  {"infinitive": "fahren", "auxiliaryVerb": "L1761"},
  {"infinitive": "fahren", "auxiliaryVerb": "L4179"},
  {"infinitive": "fahren", "pastParticiple": "gefahren", "presFPS": "fahre"}
]"#,
    );
    write_queried(
        root,
        "Russian",
        WordKind::Prepositions,
        r#"[
  {"preposition": "с", "case": "instrumental case"},
  {"preposition": "с", "case": "genitive case"}
]"#,
    );
}

#[test]
fn discovers_only_supported_existing_files() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    seed(data.path());
    // Swedish has no preposition profile, so this file is never picked up.
    write_queried(data.path(), "Swedish", WordKind::Prepositions, "[]");

    let jobs = discover_jobs(data.path(), out.path(), &[], LoadMode::Owned);
    let labels: Vec<String> = jobs.iter().map(|j| j.label()).collect();
    assert_eq!(
        labels,
        vec!["German nouns", "German verbs", "Russian prepositions"]
    );
    assert_eq!(
        jobs[0].output,
        out.path().join("German").join("nouns.json")
    );

    let only_russian = discover_jobs(data.path(), out.path(), &[Language::Russian], LoadMode::Mmap);
    assert_eq!(only_russian.len(), 1);
    assert_eq!(only_russian[0].kind, WordKind::Prepositions);
}

#[test]
fn run_job_writes_formatted_nouns() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    seed(data.path());

    let jobs = discover_jobs(data.path(), out.path(), &[Language::German], LoadMode::Mmap);
    let report = run_job(&jobs[0]).unwrap();
    assert_eq!(report.kind, WordKind::Nouns);
    assert_eq!(report.records, 3);
    assert_eq!(report.entries, 4);

    let written = fs::read_to_string(&report.output).unwrap();
    assert!(written.contains("\"Wörter\""));
    assert!(written.ends_with("}\n"));
    let nouns = read_json(&report.output);
    assert_eq!(nouns["Wort"]["plural"], "Wörter");
    assert_eq!(nouns["Wort"]["form"], "N");
    assert_eq!(nouns["Worte"]["form"], "PL");
    assert_eq!(nouns["Leute"]["plural"], "isPlural");
}

#[tokio::test]
async fn batch_continues_past_a_failing_job() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    seed(data.path());
    write_queried(
        data.path(),
        "Spanish",
        WordKind::Nouns,
        r#"[{"singular": "casa", "plural": ""}]"#,
    );

    let jobs = discover_jobs(data.path(), out.path(), &[], LoadMode::Owned);
    assert_eq!(jobs.len(), 4);
    let report = run_batch(jobs, 2).await;

    assert!(!report.is_success());
    assert_eq!(report.completed.len(), 3);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].label, "Spanish nouns");
    assert!(
        format!("{:#}", report.failed[0].error).contains("malformed record at position 0")
    );
    assert!(!out.path().join("Spanish").join("nouns.json").exists());

    let verbs = read_json(&out.path().join("German").join("verbs.json"));
    assert_eq!(verbs["fahren"]["perfFPS"], "bin/habe gefahren");
    assert_eq!(verbs["fahren"]["presFPS"], "fahre");

    let prepositions = read_json(&out.path().join("Russian").join("prepositions.json"));
    assert_eq!(prepositions["с"], "Gen/Ins");
}

#[test]
fn formatted_output_serializes_as_a_plain_mapping() {
    let mut map = std::collections::BTreeMap::new();
    map.insert("mit".to_string(), "Dat".to_string());
    let output = FormattedOutput::Prepositions(map);
    assert_eq!(output.kind(), WordKind::Prepositions);
    assert_eq!(
        scribe_json::to_json_string(&output).unwrap(),
        "{\n  \"mit\": \"Dat\"\n}\n"
    );
}
