use anyhow::{Context, Result};
use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};
use teripang_core::{
    analysis::{
        age::AgeAnalysis,
        lwr::{LwrAnalysis, ParameterSource},
        multispecies::MultispeciesAnalysis,
        AnalysisParams, AnalysisResult,
    },
    export::ResultWriter,
    pipeline::ReferenceTables,
    session::AnalysisSession,
    stats::Statistics,
};
use teripang_schemas::mode::AnalysisMode;

const PREVIEW_ROWS: usize = 20;

/// Where and whether a run writes its output.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_dir: PathBuf,
    pub export: bool,
    /// Copied into the run directory when the run came from a request file.
    pub request_file: Option<PathBuf>,
}

#[derive(Debug)]
pub struct RunOutcome {
    pub result: AnalysisResult,
    pub run_dir: Option<PathBuf>,
}

/// Reads `input`, analyzes it in `mode`, prints the report and exports the results.
pub fn run_analysis(
    mode: AnalysisMode,
    input: &Path,
    params: &AnalysisParams,
    tables: &ReferenceTables,
    options: &RunOptions,
) -> Result<RunOutcome> {
    println!("\n--- [Workflow] Starting {} analysis ---", mode);

    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read measurements from {}", input.display()))?;

    let mut session = AnalysisSession::builder()
        .with_mode(mode)
        .with_reference_tables(tables)
        .build();
    let loaded = session
        .load_text(&text)
        .with_context(|| format!("No usable {} records in {}", mode, input.display()))?;
    println!("Loaded {} records from '{}'", loaded, input.display());

    let result = session
        .analyze(params)
        .with_context(|| format!("{} analysis failed", mode))?
        .clone();

    print_report(&result);

    let run_dir = if options.export {
        Some(export_run(&result, options)?)
    } else {
        None
    };

    Ok(RunOutcome { result, run_dir })
}

fn export_run(result: &AnalysisResult, options: &RunOptions) -> Result<PathBuf> {
    let run_dir = options.output_dir.join(format!(
        "{}_{}",
        result.mode(),
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ));
    fs::create_dir_all(&run_dir)
        .with_context(|| format!("Failed to create output directory: {}", run_dir.display()))?;

    let csv_path = run_dir.join("results.csv");
    let mut writer = ResultWriter::create(&csv_path)?;
    writer.write(result)?;
    writer.into_inner()?;

    let summary_path = run_dir.join("summary.json");
    let summary = serde_json::to_string_pretty(result).context("Failed to serialize summary")?;
    fs::write(&summary_path, summary)
        .with_context(|| format!("Failed to write {}", summary_path.display()))?;

    if let Some(request) = &options.request_file {
        let name = request
            .file_name()
            .unwrap_or_else(|| OsStr::new("request.yaml"));
        fs::copy(request, run_dir.join(name))
            .with_context(|| format!("Failed to copy {}", request.display()))?;
    }

    println!("\nResults written to '{}'", run_dir.display());
    Ok(run_dir)
}

fn print_report(result: &AnalysisResult) {
    println!("\n\n--- [Summary Report] ---");
    println!("========================================");
    match result {
        AnalysisResult::Age(analysis) => print_age_report(analysis),
        AnalysisResult::Lwr(analysis) => print_lwr_report(analysis),
        AnalysisResult::Multispecies(analysis) => print_multispecies_report(analysis),
    }
    println!("========================================");
}

fn print_stats(label: &str, unit: &str, stats: &Statistics) {
    println!(
        "  - {:<10} avg {:.2} {unit} (min {:.2}, max {:.2}, median {:.2}, sd {:.2})",
        label, stats.avg, stats.min, stats.max, stats.median, stats.std_dev
    );
}

fn print_age_report(analysis: &AgeAnalysis) {
    println!("Von Bertalanffy Age Estimation:");
    if let Some(species) = &analysis.species {
        println!("  - Species: {}", species);
    }
    println!("  - L∞ = {:.2} cm, k = {:.3} /year", analysis.params.linf, analysis.params.k);
    println!(
        "  - Records aged: {} ({} excluded at or above L∞)",
        analysis.records.len(),
        analysis.excluded
    );
    print_stats("Length", "cm", &analysis.length_stats);
    print_stats("Age", "years", &analysis.age_stats);
    if let Some(fit) = &analysis.prediction_fit {
        println!("  - Predicted vs observed length R² = {:.4}", fit.r2);
    }
    println!("----------------------------------------");

    let interpretation = &analysis.interpretation;
    println!(
        "\nAverage length {:.2} cm corresponds to {:.2} years ({:.1} months).",
        interpretation.avg_length,
        interpretation.avg_age,
        interpretation.avg_age * 12.0
    );
    if let Some(phase) = &interpretation.phase {
        println!("Growth phase: {}", phase);
    }
    if let Some(info) = &interpretation.species {
        println!("{} ({}): {}", info.name, info.common_name, info.description);
    }

    println!("\n  {:>10} {:>10} {:>10} {:>12}", "Length", "Age", "Months", "Predicted");
    for row in analysis.records.iter().take(PREVIEW_ROWS) {
        println!(
            "  {:>10.2} {:>10.3} {:>10.1} {:>12.2}",
            row.length, row.age, row.age_months, row.predicted_length
        );
    }
    print_truncation(analysis.records.len());
}

fn print_lwr_report(analysis: &LwrAnalysis) {
    println!("Length-Weight Relationship:");
    if let Some(info) = &analysis.species {
        println!("  - Species: {} ({})", info.name, info.common_name);
    }
    let source = match analysis.source {
        ParameterSource::Supplied => "supplied",
        ParameterSource::Species => "species table",
        ParameterSource::Fitted => "fitted",
    };
    println!(
        "  - W = {:.4} × L^{:.4} ({})",
        analysis.params.a, analysis.params.b, source
    );
    if let Some(fit) = &analysis.log_fit {
        println!("  - Log-log fit R² = {:.4}", fit.r2);
    }
    if let Some(r2) = analysis.prediction_r2 {
        println!("  - Predicted vs observed weight R² = {:.4}", r2);
    }
    println!("  - Growth pattern: {}", analysis.growth_pattern);
    print_stats("Length", "cm", &analysis.length_stats);
    print_stats("Weight", "g", &analysis.weight_stats);
    print_stats("Condition", "", &analysis.condition_stats);
    println!("----------------------------------------");

    let condition = &analysis.condition;
    println!(
        "\nAverage condition factor {:.3}: {}",
        condition.avg, condition.class
    );
    println!(
        "  - Good condition (K >= 1.0): {} ({:.1}%)",
        condition.good_count, condition.good_percentage
    );
    println!(
        "  - Poor condition (K < 1.0):  {} ({:.1}%)",
        condition.poor_count, condition.poor_percentage
    );
    println!("{}", analysis.growth_pattern.detail());

    println!(
        "\n  {:>10} {:>10} {:>12} {:>10}",
        "Length", "Weight", "Predicted", "K"
    );
    for row in analysis.records.iter().take(PREVIEW_ROWS) {
        println!(
            "  {:>10.2} {:>10.2} {:>12.2} {:>10.3}",
            row.length, row.weight_actual, row.weight_predicted, row.condition_factor
        );
    }
    print_truncation(analysis.records.len());
}

fn print_multispecies_report(analysis: &MultispeciesAnalysis) {
    println!("Multispecies Analysis: {}", analysis.location);
    println!(
        "  - {} records across {} species",
        analysis.total_records,
        analysis.groups.len()
    );
    for group in &analysis.groups {
        println!("----------------------------------------");
        println!("{} (n = {})", group.species, group.count);
        print_stats("Length", "cm", &group.length_stats);
        print_stats("Weight", "g", &group.weight_stats);
        if let Some(age) = &group.age {
            match age.avg_age {
                Some(avg) => println!(
                    "  - Average age {:.2} years from {} records (L∞ = {:.2}, k = {:.3})",
                    avg, age.aged_count, age.params.linf, age.params.k
                ),
                None => println!("  - No record below L∞ = {:.2}; age not estimated", age.params.linf),
            }
        }
        match &group.lwr {
            Some(lwr) => {
                println!(
                    "  - W = {:.4} × L^{:.4}, R² = {:.4} ({})",
                    lwr.a, lwr.b, lwr.r2, lwr.growth_pattern
                );
                println!(
                    "  - Condition {:.3} ({}), {} in good condition ({:.1}%)",
                    lwr.avg_condition,
                    lwr.condition_interpretation,
                    lwr.good_condition_count,
                    lwr.good_condition_percentage
                );
            }
            None => println!("  - Length-weight relationship not estimated for this group"),
        }
    }
}

fn print_truncation(total: usize) {
    if total > PREVIEW_ROWS {
        println!("  ... showing {} of {} rows", PREVIEW_ROWS, total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teripang_schemas::species::{SpeciesDatabase, SpeciesParameters};

    fn options(dir: &Path, export: bool) -> RunOptions {
        RunOptions {
            output_dir: dir.join("runs"),
            export,
            request_file: None,
        }
    }

    #[test]
    fn lwr_run_writes_results_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("lwr.csv");
        fs::write(&input, "10,10\n15,33.75\n20,80\n25,156.25\n").unwrap();

        let outcome = run_analysis(
            AnalysisMode::Lwr,
            &input,
            &AnalysisParams::default(),
            &ReferenceTables::default(),
            &options(dir.path(), true),
        )
        .unwrap();

        assert_eq!(outcome.result.len(), 4);
        let run_dir = outcome.run_dir.unwrap();
        assert!(run_dir.file_name().unwrap().to_string_lossy().starts_with("lwr_"));
        let csv = fs::read_to_string(run_dir.join("results.csv")).unwrap();
        assert_eq!(csv.lines().count(), 5);
        assert!(run_dir.join("summary.json").is_file());
    }

    #[test]
    fn age_run_uses_species_parameters_without_export() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("lengths.csv");
        fs::write(&input, "length\n12\n18\n").unwrap();

        let mut species = SpeciesDatabase::new();
        species.insert(
            "Holothuria scabra",
            SpeciesParameters {
                linf: 38.5,
                k: 0.41,
                a: 0.27,
                b: 2.31,
                common_name: "Sandfish".to_string(),
                description: String::new(),
            },
        );
        let tables = ReferenceTables::new(species, Default::default());
        let params = AnalysisParams::new().with_species("Holothuria scabra");

        let outcome = run_analysis(
            AnalysisMode::Age,
            &input,
            &params,
            &tables,
            &options(dir.path(), false),
        )
        .unwrap();

        assert!(outcome.run_dir.is_none());
        assert!(!dir.path().join("runs").exists());
        match outcome.result {
            AnalysisResult::Age(analysis) => {
                assert_eq!(analysis.params.linf, 38.5);
                assert_eq!(analysis.records.len(), 2);
            }
            other => panic!("unexpected result {:?}", other.mode()),
        }
    }

    #[test]
    fn request_file_is_copied_into_run_dir() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("lengths.csv");
        fs::write(&input, "10\n20\n").unwrap();
        let request = dir.path().join("my_request.yaml");
        fs::write(&request, "mode: age\ninput: lengths.csv\n").unwrap();

        let mut opts = options(dir.path(), true);
        opts.request_file = Some(request);
        let outcome = run_analysis(
            AnalysisMode::Age,
            &input,
            &AnalysisParams::default(),
            &ReferenceTables::default(),
            &opts,
        )
        .unwrap();
        assert!(outcome.run_dir.unwrap().join("my_request.yaml").is_file());
    }

    #[test]
    fn unreadable_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_analysis(
            AnalysisMode::Age,
            &dir.path().join("missing.csv"),
            &AnalysisParams::default(),
            &ReferenceTables::default(),
            &options(dir.path(), false),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read measurements"));
    }

    #[test]
    fn multispecies_without_location_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("mixed.csv");
        fs::write(&input, "A,10,20\nA,12,30\n").unwrap();
        let err = run_analysis(
            AnalysisMode::Multispecies,
            &input,
            &AnalysisParams::default(),
            &ReferenceTables::default(),
            &options(dir.path(), false),
        )
        .unwrap_err();
        assert!(err.to_string().contains("multispecies analysis failed"));
    }
}
