use teripang_core::{
    analysis::{AnalysisParams, AnalysisResult},
    parser::ParsedRecords,
    pipeline::ReferenceTables,
    session::{AnalysisSession, SessionState},
    ErrorKind, TeripangError,
};
use std::sync::Arc;
use teripang_schemas::{
    classification::{ClassificationRule, ClassificationTable},
    measurement::Measurement,
    mode::AnalysisMode,
    species::SpeciesDatabase,
};

#[test]
fn starts_empty_and_refuses_to_analyze() {
    let mut session = AnalysisSession::builder().build();
    assert_eq!(session.mode(), AnalysisMode::Age);
    assert_eq!(session.state(), SessionState::Empty);

    let err = session.analyze(&AnalysisParams::new()).unwrap_err();
    assert!(matches!(err, TeripangError::NoDataLoaded(AnalysisMode::Age)));
    assert_eq!(err.kind(), ErrorKind::EmptyInput);
}

#[test]
fn load_then_analyze_reaches_results_computed() {
    let mut session = AnalysisSession::builder().with_mode(AnalysisMode::Lwr).build();
    assert_eq!(session.load_text("20,96\n25,180\n30,320\n").unwrap(), 3);
    assert_eq!(session.state(), SessionState::DataLoaded);

    let result = session.analyze(&AnalysisParams::new()).unwrap();
    assert_eq!(result.mode(), AnalysisMode::Lwr);
    assert_eq!(result.len(), 3);
    assert_eq!(session.state(), SessionState::ResultsComputed);
}

#[test]
fn switching_mode_clears_records_and_results() {
    let mut session = AnalysisSession::builder().build();
    session.load_text("12\n15\n").unwrap();
    session.analyze(&AnalysisParams::new()).unwrap();
    assert!(session.results().is_some());

    session.switch_mode(AnalysisMode::Lwr);
    assert_eq!(session.mode(), AnalysisMode::Lwr);
    assert_eq!(session.state(), SessionState::Empty);
    assert!(session.results().is_none());
    assert!(session.records().is_none());
}

#[test]
fn failed_analysis_publishes_nothing() {
    let mut session = AnalysisSession::builder().build();
    session.load_text("12\n15\n").unwrap();
    session.analyze(&AnalysisParams::new()).unwrap();

    let params = AnalysisParams::new().with_growth(10.0, 0.34);
    let err = session.analyze(&params).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoProcessableData);
    assert!(session.results().is_none());
    assert_eq!(session.state(), SessionState::DataLoaded);
}

#[test]
fn reloading_replaces_records_and_drops_results() {
    let mut session = AnalysisSession::builder().build();
    session.load_text("12\n15\n").unwrap();
    session.analyze(&AnalysisParams::new()).unwrap();

    assert_eq!(session.load_text("8\n9\n10\n").unwrap(), 3);
    assert_eq!(session.state(), SessionState::DataLoaded);
    assert_eq!(session.records().unwrap().len(), 3);

    assert!(session.load_text("not a number\n").is_err());
    assert_eq!(session.state(), SessionState::Empty);
}

#[test]
fn load_records_checks_mode() {
    let mut session = AnalysisSession::builder().with_mode(AnalysisMode::Lwr).build();
    let records = ParsedRecords::Age(vec![Measurement::length_only(10.0)]);
    let err = session.load_records(records).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);

    let records = ParsedRecords::Lwr(vec![Measurement::with_weight(10.0, 12.0)]);
    assert_eq!(session.load_records(records).unwrap(), 1);
    let params = AnalysisParams::new().with_lwr_parameters(0.012, 3.0);
    let AnalysisResult::Lwr(analysis) = session.analyze(&params).unwrap() else {
        panic!("expected LWR results");
    };
    assert_eq!(analysis.records[0].weight_actual, 12.0);
}

#[test]
fn reset_keeps_mode() {
    let mut session = AnalysisSession::builder().with_mode(AnalysisMode::Multispecies).build();
    session.load_text("Holothuria scabra,10,12\n").unwrap();
    session.reset();
    assert_eq!(session.mode(), AnalysisMode::Multispecies);
    assert_eq!(session.state(), SessionState::Empty);
}

#[test]
fn sessions_share_reference_tables() {
    let mut rules = ClassificationTable::new();
    rules.insert(
        ClassificationTable::DEFAULT_KEY,
        vec![ClassificationRule { min: 0.0, max: 100.0, phase: "any".to_string() }],
    );
    let tables = ReferenceTables::new(SpeciesDatabase::new(), rules);

    let mut first = AnalysisSession::builder().with_reference_tables(&tables).build();
    let second = AnalysisSession::builder()
        .with_mode(AnalysisMode::Lwr)
        .with_reference_tables(&tables)
        .build();
    assert!(Arc::ptr_eq(&first.tables().classifications, &second.tables().classifications));

    first.load_text("12\n14\n").unwrap();
    let AnalysisResult::Age(age) = first.analyze(&AnalysisParams::default()).unwrap() else {
        panic!("expected age result");
    };
    assert_eq!(age.interpretation.phase.as_deref(), Some("any"));
}
