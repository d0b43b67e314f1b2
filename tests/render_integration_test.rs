//! Integration tests for rendering a report to its artifact
//!
//! These tests verify that:
//! - Artifacts land at deterministic paths and are overwritten on re-render
//! - Formatting helper failures are masked
//! - Other helper failures leave partial output plus a diagnostic block
//! - The subject set generator runs only when no subject set is supplied

use folio::adapters::FileReportDefinition;
use folio::config::ReportEntry;
use folio::core::output::OutputPathResolver;
use folio::core::render::{RenderScope, RenderStatus, ReportRenderer};
use folio::domain::ids::Locale;
use folio::domain::report::{InlineReport, ReportDefinition};
use folio::domain::subject::{DataSubject, DataSubjectSet};
use folio::domain::FolioError;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

fn renderer(root: &Path) -> ReportRenderer {
    ReportRenderer::new(OutputPathResolver::new(root, "dataExports"))
}

fn patients() -> DataSubjectSet {
    DataSubjectSet::from_subjects(vec![
        DataSubject::new("1001")
            .unwrap()
            .with_attribute("name", json!("Ada"))
            .with_attribute("birthdate", json!("1985-03-09"))
            .with_attribute("weight", json!(61.27)),
        DataSubject::new("1002")
            .unwrap()
            .with_attribute("name", json!("Grace"))
            .with_attribute("birthdate", json!("not a date"))
            .with_attribute("weight", json!("heavy")),
    ])
}

#[test]
fn test_monthly_visits_path() {
    let temp_dir = TempDir::new().unwrap();
    let report = InlineReport::new("visits", "Monthly Visits", "ok").unwrap();

    let outcome = renderer(temp_dir.path())
        .render(&report, Some(patients()), &RenderScope::default())
        .unwrap();

    assert_eq!(
        outcome.path,
        temp_dir.path().join("dataExports").join("Monthly_Visits_en_us")
    );
    assert_eq!(fs::read_to_string(&outcome.path).unwrap(), "ok");
}

#[test]
fn test_rerender_overwrites_artifact() {
    let temp_dir = TempDir::new().unwrap();
    let r = renderer(temp_dir.path());
    let scope = RenderScope::default();

    let long = InlineReport::new("r", "Same Name", "a much longer first rendering").unwrap();
    let short = InlineReport::new("r", "Same Name", "short").unwrap();

    let first = r.render(&long, Some(DataSubjectSet::new()), &scope).unwrap();
    let second = r.render(&short, Some(DataSubjectSet::new()), &scope).unwrap();

    assert_eq!(first.path, second.path);
    assert_eq!(fs::read_to_string(&second.path).unwrap(), "short");
    assert_eq!(
        fs::read_dir(temp_dir.path().join("dataExports")).unwrap().count(),
        1
    );
}

#[test]
fn test_formatting_failures_are_masked() {
    let temp_dir = TempDir::new().unwrap();
    let template = "\
{% for p in patientSet %}{{ p.id }}|{{ fn.format_date(p.birthdate, '%Y') }}|{{ fn.format_number(p.weight, 1) }}
{% endfor %}end";
    let report = InlineReport::new("r", "Masked", template).unwrap();

    let outcome = renderer(temp_dir.path())
        .render(&report, Some(patients()), &RenderScope::default())
        .unwrap();

    assert_eq!(outcome.status, RenderStatus::Complete);
    let content = fs::read_to_string(&outcome.path).unwrap();
    assert_eq!(content, "1001|1985|61.3\n1002||\nend");
    assert!(!content.contains("Error:"));
}

#[test]
fn test_non_formatting_failure_writes_diagnostic() {
    let temp_dir = TempDir::new().unwrap();
    let template = "\
Report
{% for p in patientSet %}{{ p.id }}:{{ fn.field(p, 'height') }}
{% endfor %}Footer";
    let report = InlineReport::new("r", "Heights", template).unwrap();

    let outcome = renderer(temp_dir.path())
        .render(&report, Some(patients()), &RenderScope::default())
        .unwrap();

    let error = match &outcome.status {
        RenderStatus::Partial { error } => error.clone(),
        RenderStatus::Complete => panic!("expected a partial render"),
    };
    assert!(error.contains("height"));

    let content = fs::read_to_string(&outcome.path).unwrap();
    let (partial, diagnostic) = content.split_once("\n\nError: \n").unwrap();
    assert_eq!(partial, "Report\n1001:");
    let (summary, trace) = diagnostic.split_once("\n Stacktrace: \n").unwrap();
    assert!(summary.contains("subject has no field 'height'"));
    assert!(!trace.is_empty());
    assert!(!content.contains("Footer"));
}

#[test]
fn test_undefined_helper_writes_diagnostic() {
    let temp_dir = TempDir::new().unwrap();
    let report = InlineReport::new("r", "Unknown Helper", "x{{ fn.nope() }}").unwrap();

    let outcome = renderer(temp_dir.path())
        .render(&report, Some(DataSubjectSet::new()), &RenderScope::default())
        .unwrap();

    assert!(!outcome.is_complete());
    assert!(fs::read_to_string(&outcome.path)
        .unwrap()
        .starts_with("x\n\nError: \n"));
}

#[test]
fn test_generator_invocation_count() {
    let temp_dir = TempDir::new().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let report = InlineReport::new("r", "Counted", "{{ patientSet | length }}")
        .unwrap()
        .with_generator(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(patients())
        });
    let r = renderer(temp_dir.path());
    let scope = RenderScope::default();

    r.render(&report, Some(DataSubjectSet::new()), &scope).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let outcome = r.render(&report, None, &scope).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(fs::read_to_string(outcome.path).unwrap(), "2");
}

#[test]
fn test_failing_definition_truncates_previous_artifact() {
    let temp_dir = TempDir::new().unwrap();
    let r = renderer(temp_dir.path());
    let scope = RenderScope::default();

    let good = InlineReport::new("r", "Cohort", "previous").unwrap();
    let outcome = r.render(&good, Some(DataSubjectSet::new()), &scope).unwrap();

    let broken = InlineReport::new("r", "Cohort", "unused")
        .unwrap()
        .with_generator(|| Err("cohort service down".to_string()));
    let err = r.render(&broken, None, &scope).unwrap_err();

    assert!(matches!(err, FolioError::SubjectSetGeneration { .. }));
    assert!(outcome.path.exists());
    assert_eq!(fs::read_to_string(outcome.path).unwrap(), "");
}

#[test]
fn test_unwritable_output_propagates() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not-a-dir");
    fs::write(&blocker, "file").unwrap();
    let report = InlineReport::new("r", "Blocked", "x").unwrap();

    let err = renderer(&blocker)
        .render(&report, Some(DataSubjectSet::new()), &RenderScope::default())
        .unwrap_err();

    assert!(matches!(err, FolioError::Output { .. }));
}

#[test]
fn test_locale_is_per_call() {
    let temp_dir = TempDir::new().unwrap();
    let r = renderer(temp_dir.path());
    let report = InlineReport::new("r", "Greeting", "{{ locale }}").unwrap();

    let fr = RenderScope::new(Locale::new("fr_FR").unwrap());
    let en = RenderScope::new(Locale::new("en_GB").unwrap()).with_actor("clerk");

    let a = r.render(&report, Some(DataSubjectSet::new()), &fr).unwrap();
    let b = r.render(&report, Some(DataSubjectSet::new()), &en).unwrap();

    assert_ne!(a.path, b.path);
    assert_eq!(fs::read_to_string(a.path).unwrap(), "fr_FR");
    assert_eq!(fs::read_to_string(b.path).unwrap(), "en_GB");
}

#[test]
fn test_concurrent_renders_do_not_share_context() {
    let temp_dir = TempDir::new().unwrap();
    let root: PathBuf = temp_dir.path().to_path_buf();

    let handles: Vec<_> = ["en_US", "fr_FR", "de_DE", "es_ES"]
        .into_iter()
        .map(|locale| {
            let root = root.clone();
            std::thread::spawn(move || {
                let report = InlineReport::new("r", "Parallel", "{{ locale }}").unwrap();
                let scope = RenderScope::new(Locale::new(locale).unwrap());
                renderer(&root)
                    .render(&report, Some(DataSubjectSet::new()), &scope)
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        let outcome = handle.join().unwrap();
        let content = fs::read_to_string(&outcome.path).unwrap();
        let suffix = content.to_lowercase();
        assert!(outcome.path.to_string_lossy().ends_with(&suffix));
    }
}

#[test]
fn test_file_backed_definition() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("roster.j2"),
        "{% for p in patientSet %}{{ p.name }} ({{ fn.format_date(p.birthdate, '%d.%m.%Y') }})\n{% endfor %}",
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("roster.json"),
        r#"[{"id": "1", "name": "Ada", "birthdate": "1985-03-09"}]"#,
    )
    .unwrap();

    let entry = ReportEntry {
        id: "roster".to_string(),
        name: "Ward Roster".to_string(),
        template_path: PathBuf::from("roster.j2"),
        subjects_path: PathBuf::from("roster.json"),
    };
    let definition = FileReportDefinition::from_entry(&entry, temp_dir.path()).unwrap();
    let out_root = temp_dir.path().join("data");

    let outcome = renderer(&out_root)
        .render(&definition, None, &RenderScope::default())
        .unwrap();

    assert_eq!(definition.id().as_str(), "roster");
    assert!(outcome.path.ends_with("Ward_Roster_en_us"));
    assert_eq!(
        fs::read_to_string(outcome.path).unwrap(),
        "Ada (09.03.1985)\n"
    );
}

#[test]
fn test_custom_helper_with_masking() {
    let temp_dir = TempDir::new().unwrap();
    let report = InlineReport::new("r", "Custom", "[{{ fn.initials(patientSet[0].name) }}]").unwrap();

    let outcome = renderer(temp_dir.path())
        .with_helper("initials", |args| {
            let name = args
                .first()
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    minijinja::Error::new(minijinja::ErrorKind::InvalidOperation, "name required")
                })?;
            Ok(name.chars().take(1).collect::<String>().into())
        })
        .render(&report, Some(patients()), &RenderScope::default())
        .unwrap();

    assert_eq!(fs::read_to_string(outcome.path).unwrap(), "[A]");
}
