use sg_developer_monitor::config::AppConfig;
use sg_developer_monitor::models::{ArticleRecord, RatioRecord, Severity, Status};
use sg_developer_monitor::services::classifier::{Classifier, Taxonomy};
use sg_developer_monitor::services::macro_data::{MacroConnector, MacroSourceKind};
use sg_developer_monitor::services::scoring::{score_company, ScoringPolicy};
use sg_developer_monitor::state::AppState;

fn grid() -> Vec<Option<f64>> {
    vec![None, Some(0.0), Some(0.5), Some(1.0), Some(1.6), Some(3.5), Some(7.0), Some(12.0)]
}

#[test]
fn score_is_bounded_rounded_and_status_consistent() {
    let policy = ScoringPolicy::default();
    for nde in grid() {
        for dte in grid() {
            for cover in grid() {
                for delta in [-2.0, 0.0, 0.37, 1.0, 4.0] {
                    let record = RatioRecord {
                        net_debt_to_ebitda: nde,
                        debt_to_equity: dte,
                        current_ratio: cover,
                        quick_ratio: dte,
                        interest_coverage: cover,
                        prior_quarter_delta: delta,
                        ..RatioRecord::new("Grid Dev", "GRD")
                    };
                    let result = policy.score(&record);

                    assert!((0.0..=100.0).contains(&result.score));
                    assert!(((result.score * 10.0).round() - result.score * 10.0).abs() < 1e-9);
                    assert_eq!(result.status, policy.cutoffs.status_for(result.score));
                    assert!(!result.drivers.is_empty());
                }
            }
        }
    }
}

#[test]
fn status_tiers_follow_score_cutoffs() {
    let cutoffs = ScoringPolicy::default().cutoffs;
    assert_eq!(cutoffs.status_for(100.0), Status::Green);
    assert_eq!(cutoffs.status_for(70.0), Status::Green);
    assert_eq!(cutoffs.status_for(69.9), Status::Amber);
    assert_eq!(cutoffs.status_for(45.0), Status::Amber);
    assert_eq!(cutoffs.status_for(44.9), Status::Red);
}

#[test]
fn missing_ratio_uses_conservative_fallback() {
    let base = RatioRecord {
        net_debt_to_ebitda: Some(1.0),
        debt_to_equity: Some(0.3),
        current_ratio: Some(2.0),
        quick_ratio: Some(1.5),
        interest_coverage: Some(10.0),
        ..RatioRecord::new("UOL Group", "U14")
    };
    let unknown = score_company(&RatioRecord { interest_coverage: None, ..base.clone() });
    let explicit = score_company(&RatioRecord { interest_coverage: Some(1.0), ..base.clone() });
    assert_eq!(unknown, explicit);
    assert_eq!(unknown.drivers, vec!["Weak interest coverage".to_string()]);
}

#[test]
fn classifier_output_is_always_fully_populated() {
    let classifier = Classifier::new(Taxonomy::default()).unwrap();
    let entities = vec!["CapitaLand Investment".to_string(), "Hongkong Land".to_string()];
    let texts = [
        ("", ""),
        ("CapitaLand Investment downgrade", "negative outlook from agency"),
        ("Hongkong Land faces lawsuit", "default risk noted"),
        ("Stop work order issued", "site paused"),
        ("Quarterly dividend unchanged", ""),
    ];
    let articles: Vec<ArticleRecord> = texts
        .iter()
        .map(|(t, s)| ArticleRecord::new(*t, *s, "Reuters", chrono::Utc::now(), ""))
        .collect();

    let out = classifier.classify(articles, &entities);
    for article in &out {
        assert!(!article.developers.is_empty());
        assert_eq!(article.matched_terms.is_empty(), article.theme == "general");
        if article.theme == "general" {
            assert_eq!(article.severity, Severity::Info);
        }
    }
    assert_eq!(out[1].theme, "ratings");
    assert_eq!(out[1].severity, Severity::Watch);
    assert_eq!(out[1].developers, vec!["CapitaLand Investment".to_string()]);
    assert_eq!(out[2].theme, "legal");
    assert_eq!(out[2].matched_terms, vec!["lawsuit", "default"]);
    assert_eq!(out[3].theme, "project_delay");
}

#[test]
fn shipped_config_builds_a_working_state() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/dashboard.json");
    let config = AppConfig::load(path).expect("shipped config parses");
    assert!(!config.companies.is_empty());
    assert!(AppState::new(config).is_ok());
}

#[test]
fn live_macro_sources_are_rejected_at_startup() {
    let mut config = AppConfig::default();
    config.settings.macro_source = MacroSourceKind::Ura;
    let err = AppState::new(config).err().expect("ura is not implemented");
    assert!(err.to_string().contains("URA connector is not configured"));
    assert!(MacroConnector::resolve(MacroSourceKind::Mock, 1).is_ok());
}

#[test]
fn taxonomy_override_from_config_is_case_insensitive() {
    let raw = r#"{ "taxonomy": { "themes": [
        { "theme": "project_delay", "patterns": ["\\bTOP\\b"] }
    ] } }"#;
    let config = AppConfig::from_json(raw, "inline").unwrap();
    let classifier = Classifier::new(config.taxonomy).unwrap();

    let hit = classifier.classify_text("Project nears TOP", "", &[]);
    assert_eq!(hit.theme, "project_delay");
    assert_eq!(hit.severity, Severity::Watch);
    assert_eq!(hit.matched_terms, vec![r"\bTOP\b".to_string()]);

    let miss = classifier.classify_text("Sales topped forecasts", "", &[]);
    assert_eq!(miss.theme, "general");
}
