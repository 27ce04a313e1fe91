//! End-to-end tests of the scoring pipeline with a deterministic encoder

mod common;

use approx::assert_relative_eq;
use common::engine;
use resume_scorer::input::InputManager;
use resume_scorer::processing::feedback::MatchBand;
use std::path::PathBuf;
use std::sync::Arc;

const RESUME: &str = "Experienced Python developer skilled in Django and REST APIs";
const JOB: &str = "Seeking Python developer with Django and Flask experience";

#[test]
fn test_python_django_scenario() {
    let report = engine().analyze_report(RESUME, JOB).unwrap();
    let result = &report.result;

    // Noun chunks and role nouns count as job keywords next to single skills,
    // so only flask of the five is missing.
    assert_eq!(
        result.jd_keywords,
        vec!["flask", "django", "python developer", "developer", "python"]
    );
    assert!(result.resume_keywords.contains(&"rest api".to_string()));
    assert_relative_eq!(result.keyword_match_score, 0.8, epsilon = 1e-9);
    assert_eq!(result.feedback.missing_keywords_suggestions, vec!["flask"]);

    let expected = 100.0 * (0.6 * result.semantic_similarity_score + 0.4 * 0.8);
    assert_relative_eq!(result.overall_score, expected, epsilon = 1e-9);
    assert!(result.semantic_similarity_score > 0.0);
    assert!(result.overall_score >= 50.0 && result.overall_score < 80.0);
    assert_eq!(report.band, MatchBand::Moderate);
    assert!(result.feedback.overall_summary[0].starts_with("Moderate match"));
}

#[test]
fn test_scores_stay_in_bounds() {
    let engine = engine();
    let pairs = [
        (RESUME, JOB),
        ("Registered nurse with ICU experience", "Senior Rust engineer, async networking"),
        ("Rust Rust Rust Rust", "Rust"),
        ("Data analyst: SQL, Tableau, Excel dashboards.", "Data analyst with SQL and Tableau"),
    ];

    for (resume, job) in pairs {
        let result = engine.analyze(resume, job).unwrap();
        assert!((0.0..=100.0).contains(&result.overall_score));
        assert!((0.0..=1.0).contains(&result.semantic_similarity_score));
        assert!((0.0..=1.0).contains(&result.keyword_match_score));
        assert!(result.jd_keywords.len() <= 20);
        assert!(result.feedback.missing_keywords_suggestions.len() <= 10);
    }
}

#[test]
fn test_analysis_is_idempotent() {
    let engine = engine();
    let first = engine.analyze(RESUME, JOB).unwrap();
    let second = engine.analyze(RESUME, JOB).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_identical_inputs_match_fully() {
    let result = engine().analyze(JOB, JOB).unwrap();

    assert_relative_eq!(result.keyword_match_score, 1.0);
    assert_relative_eq!(result.semantic_similarity_score, 1.0, epsilon = 1e-6);
    assert_relative_eq!(result.overall_score, 100.0, epsilon = 1e-4);
    assert!(result.feedback.missing_keywords_suggestions.is_empty());
    assert!(result.feedback.overall_summary[0].starts_with("Strong match"));
}

#[test]
fn test_alphanumeric_terms_are_keywords() {
    let text = "2019 401k 3d";
    let result = engine().analyze(text, text).unwrap();

    assert_eq!(result.jd_keywords, vec!["401k", "3d"]);
    assert_relative_eq!(result.keyword_match_score, 1.0);
    assert_relative_eq!(result.overall_score, 100.0, epsilon = 1e-4);
}

#[test]
fn test_numbers_alone_are_insufficient_input() {
    let result = engine().analyze("2019 2020", JOB).unwrap();

    assert_eq!(result.overall_score, 0.0);
    assert!(result.jd_keywords.is_empty());
    assert!(result.feedback.overall_summary[0].starts_with("Insufficient input"));
}

#[test]
fn test_keyword_score_is_asymmetric() {
    let engine = engine();
    let forward = engine.analyze(RESUME, JOB).unwrap();
    let swapped = engine.analyze(JOB, RESUME).unwrap();

    assert_relative_eq!(swapped.keyword_match_score, 4.0 / 7.0, epsilon = 1e-9);
    assert!(forward.keyword_match_score != swapped.keyword_match_score);
    assert_relative_eq!(
        forward.semantic_similarity_score,
        swapped.semantic_similarity_score,
        epsilon = 1e-9
    );
}

#[test]
fn test_degenerate_inputs() {
    let engine = engine();

    for (resume, job) in [("", JOB), (RESUME, "   "), ("the and of", "!!! ???")] {
        let result = engine.analyze(resume, job).unwrap();
        assert_eq!(result.overall_score, 0.0);
        assert_eq!(result.semantic_similarity_score, 0.0);
        assert_eq!(result.keyword_match_score, 0.0);
        assert!(result.resume_keywords.is_empty());
        assert!(result.jd_keywords.is_empty());
        assert!(result.feedback.overall_summary[0].starts_with("Insufficient input"));
    }
}

#[test]
fn test_engine_shared_across_threads() {
    let engine = Arc::new(engine());
    let expected = engine.analyze(RESUME, JOB).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                scope.spawn(move || engine.analyze(RESUME, JOB).unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_result_json_shape() {
    let result = engine().analyze(RESUME, JOB).unwrap();
    let value = serde_json::to_value(&result).unwrap();

    let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "feedback",
            "jd_keywords",
            "keyword_match_score",
            "overall_score",
            "resume_keywords",
            "semantic_similarity_score",
        ]
    );

    let feedback = value["feedback"].as_object().unwrap();
    for key in [
        "overall_summary",
        "strengths",
        "areas_for_improvement",
        "missing_keywords_suggestions",
    ] {
        assert!(feedback[key].is_array(), "{} should be a list", key);
    }
}

#[test]
fn test_report_metadata() {
    let report = engine().analyze_report(RESUME, JOB).unwrap();

    assert_eq!(report.metadata.model_name, "hashing-test-encoder");
    assert_eq!(report.metadata.resume_tokens, 5);
    assert!(!report.metadata.input_truncated);
    assert_eq!(report.breakdown.missing_keywords, vec!["flask"]);
}

#[tokio::test]
async fn test_fixture_files_end_to_end() {
    let fixtures = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");
    let mut input_manager = InputManager::new();
    let resume = input_manager
        .extract_text(&fixtures.join("sample_resume.txt"))
        .await
        .unwrap();
    let job = input_manager
        .extract_text(&fixtures.join("sample_job.txt"))
        .await
        .unwrap();

    let result = engine().analyze(&resume, &job).unwrap();

    assert!(result.keyword_match_score > 0.0);
    assert!(result.semantic_similarity_score > 0.0);
    assert!(result.jd_keywords.iter().any(|k| k.contains("react")));
    assert!(!result.feedback.areas_for_improvement.is_empty() || !result.feedback.strengths.is_empty());
}
