use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use serde::Deserialize;
use teripang_core::{
    analysis::{lwr::ParameterSource, AnalysisParams, AnalysisResult},
    export::ResultWriter,
    pipeline::{self, ReferenceTables},
    ErrorKind,
};
use teripang_schemas::{
    classification::{ClassificationRule, ClassificationTable},
    mode::AnalysisMode,
    species::{SpeciesDatabase, SpeciesParameters},
};

fn tables() -> ReferenceTables {
    let mut species = SpeciesDatabase::new();
    species.insert(
        "Holothuria scabra",
        SpeciesParameters {
            linf: 38.5,
            k: 0.41,
            a: 0.27,
            b: 2.31,
            common_name: "Sandfish".into(),
            description: "Burrows in seagrass beds.".into(),
        },
    );
    let mut classifications = ClassificationTable::new();
    classifications.insert(
        "default",
        vec![
            ClassificationRule { min: 0.0, max: 10.0, phase: "juvenile".into() },
            ClassificationRule { min: 10.0, max: 20.0, phase: "sub-adult".into() },
            ClassificationRule { min: 20.0, max: 1000.0, phase: "adult".into() },
        ],
    );
    ReferenceTables::new(species, classifications)
}

#[derive(Debug, Deserialize)]
struct LwrRow {
    length_cm: f64,
    weight_actual_g: f64,
    weight_predicted_g: f64,
    condition_factor: f64,
}

#[test]
fn age_mode_end_to_end() {
    let text = "length\n12.4\n15.0\n17.9\n31.0\n";
    let params = AnalysisParams::new().with_species("Holothuria scabra");
    let AnalysisResult::Age(analysis) = pipeline::run(text, AnalysisMode::Age, &params, &tables()).unwrap()
    else {
        panic!("expected age results");
    };
    // linf comes from the species table, so 31 cm is still ageable.
    assert_eq!(analysis.params.linf, 38.5);
    assert_eq!(analysis.records.len(), 4);
    assert_eq!(analysis.excluded, 0);
    assert_eq!(analysis.interpretation.phase.as_deref(), Some("sub-adult"));
    assert_eq!(analysis.interpretation.species.unwrap().common_name, "Sandfish");
}

#[test]
fn age_mode_with_everything_above_linf() {
    let params = AnalysisParams::new().with_growth(10.0, 0.34);
    let err = pipeline::run("10\n12\n15\n", AnalysisMode::Age, &params, &tables()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoProcessableData);
}

#[test]
fn lwr_mode_fits_when_parameters_missing() {
    let text = "10,12.1\n14,33.2\n18,69.0\n22,128.5\n26,210.4\n";
    let AnalysisResult::Lwr(analysis) =
        pipeline::run(text, AnalysisMode::Lwr, &AnalysisParams::new(), &tables()).unwrap()
    else {
        panic!("expected LWR results");
    };
    assert_eq!(analysis.source, ParameterSource::Fitted);
    assert_abs_diff_eq!(analysis.params.b, 3.0, epsilon = 0.05);
    assert!(analysis.log_fit.unwrap().r2 > 0.99);
}

#[test]
fn lwr_mode_with_single_record_needs_parameters() {
    let err = pipeline::run("10,12\n", AnalysisMode::Lwr, &AnalysisParams::new(), &tables()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientData);

    let params = AnalysisParams::new().with_lwr_parameters(0.01, 3.0);
    let result = pipeline::run("10,12\n", AnalysisMode::Lwr, &params, &tables()).unwrap();
    assert_eq!(result.len(), 1);
}

#[test]
fn garbage_input_is_empty_input() {
    for mode in AnalysisMode::ALL {
        let params = AnalysisParams::new().with_location("Site A");
        let err = pipeline::run("a,b,c\n\n", mode, &params, &tables()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput, "mode {mode}");
    }
}

#[test]
fn lwr_results_round_trip_through_csv() {
    let pairs = (1..=40)
        .map(|i| {
            let length = 5.0 + f64::from(i) * 0.731;
            let weight = 0.0113 * length.powf(2.93) * (1.0 + 0.01 * f64::from(i % 7));
            (length, weight)
        })
        .collect::<Vec<_>>();
    let text = pairs
        .iter()
        .map(|(l, w)| format!("{l},{w}"))
        .collect::<Vec<_>>()
        .join("\n");

    let result = pipeline::run(&text, AnalysisMode::Lwr, &AnalysisParams::new(), &tables()).unwrap();
    let mut writer = ResultWriter::new(Vec::new());
    writer.write(&result).unwrap();
    let bytes = writer.into_inner().unwrap();

    let rows = csv::Reader::from_reader(bytes.as_slice())
        .deserialize::<LwrRow>()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(rows.len(), pairs.len());
    for (row, (length, weight)) in rows.iter().zip(&pairs) {
        assert_eq!(row.length_cm, *length);
        assert_eq!(row.weight_actual_g, *weight);
        assert!(row.weight_predicted_g > 0.0);
        assert!(row.condition_factor > 0.0);
    }
}

#[test]
fn multispecies_requires_location_and_an_analysis() {
    let text = "Holothuria scabra,10,12\n";
    let err = pipeline::run(text, AnalysisMode::Multispecies, &AnalysisParams::new(), &tables())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);

    let params = AnalysisParams::new().with_location("Site A").with_analyses(false, false);
    let err = pipeline::run(text, AnalysisMode::Multispecies, &params, &tables()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

proptest! {
    #[test]
    fn multispecies_groups_partition_the_input(
        rows in prop::collection::vec((0usize..4, 1.0..40.0f64, 1.0..900.0f64), 1..60)
    ) {
        let names = ["Holothuria scabra", "Stichopus horrens", "Bohadschia argus", "Thelenota ananas"];
        let text = rows
            .iter()
            .map(|(species, length, weight)| format!("{},{length},{weight}", names[*species]))
            .collect::<Vec<_>>()
            .join("\n");
        let params = AnalysisParams::new().with_location("Site A");
        let result = pipeline::run(&text, AnalysisMode::Multispecies, &params, &tables()).unwrap();
        let AnalysisResult::Multispecies(analysis) = result else {
            panic!("expected multispecies results");
        };

        prop_assert_eq!(analysis.total_records, rows.len());
        prop_assert_eq!(analysis.groups.iter().map(|g| g.count).sum::<usize>(), rows.len());
        for group in &analysis.groups {
            let expected = rows.iter().filter(|(s, _, _)| names[*s] == group.species).count();
            prop_assert_eq!(group.count, expected);
            if group.count < 3 {
                prop_assert!(group.lwr.is_none());
            }
        }
    }
}
