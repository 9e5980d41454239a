//! End-to-end scenarios run against the real filesystem: a source tree
//! goes in, an anonymized tree comes out. Mirrors the concrete byte-level
//! scenarios and whole-run invariants the engine is judged against.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use cobol_anonymize::{Config, NamingScheme, Pipeline};

fn temp_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("cobol-anonymize-test-{label}-{nanos}"));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_source(dir: &Path, name: &str, lines: &[&str]) {
    let body = format!("{}\n", lines.join("\n"));
    fs::write(dir.join(name), body).unwrap();
}

fn base_config(input_dir: PathBuf, output_dir: PathBuf) -> Config {
    let mut config = Config::default();
    config.input_dir = input_dir;
    config.output_dir = output_dir;
    config.overwrite = true;
    config
}

#[test]
fn s1_program_id_gets_renamed_at_the_same_column() {
    let input = temp_dir("s1-in");
    let output = temp_dir("s1-out");
    write_source(
        &input,
        "TESTPROG.cbl",
        &["       IDENTIFICATION DIVISION.", "       PROGRAM-ID.    TESTPROG."],
    );

    let mut config = base_config(input, output.clone());
    config.naming_scheme = NamingScheme::Numeric;
    let report = Pipeline::new(config).run().expect("pipeline run");

    assert_eq!(report.total_files, 1);
    let files: Vec<_> = fs::read_dir(&output).unwrap().collect();
    assert!(!files.is_empty());

    let anonymized = fs::read_to_string(
        fs::read_dir(&output)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .find(|p| p.extension().map(|e| e == "cbl").unwrap_or(false))
            .expect("anonymized program file"),
    )
    .unwrap();

    assert!(anonymized.contains("PROGRAM-ID."));
    assert!(!anonymized.contains("TESTPROG"));
    let renamed_line = anonymized.lines().find(|l| l.contains("PROGRAM-ID.")).unwrap();
    assert_eq!(
        renamed_line.find("PROGRAM-ID.").unwrap(),
        "       PROGRAM-ID.".find("PROGRAM-ID.").unwrap()
    );
}

#[test]
fn s2_pic_clause_is_protected_from_rewrite() {
    let input = temp_dir("s2-in");
    let output = temp_dir("s2-out");
    write_source(
        &input,
        "PROG.cbl",
        &[
            "       IDENTIFICATION DIVISION.",
            "       PROGRAM-ID. PROG.",
            "       DATA DIVISION.",
            "       WORKING-STORAGE SECTION.",
            "       01 WS-GROUP.",
            "           05 WS-FIELD PIC X(30).",
        ],
    );

    let config = base_config(input, output.clone());
    Pipeline::new(config).run().expect("pipeline run");

    let anonymized_path = fs::read_dir(&output)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| p.extension().map(|e| e == "cbl").unwrap_or(false))
        .expect("anonymized program file");
    let anonymized = fs::read_to_string(anonymized_path).unwrap();

    assert!(anonymized.contains("PIC X(30)."));
    assert!(!anonymized.contains("WS-FIELD"));
}

#[test]
fn s3_redefines_rewrites_both_names_consistently() {
    let input = temp_dir("s3-in");
    let output = temp_dir("s3-out");
    write_source(
        &input,
        "PROG.cbl",
        &[
            "       IDENTIFICATION DIVISION.",
            "       PROGRAM-ID. PROG.",
            "       DATA DIVISION.",
            "       WORKING-STORAGE SECTION.",
            "       01 WS-LEVEL2 PIC X(10).",
            "       01 WS-LEVEL2-R REDEFINES WS-LEVEL2 PIC 9(10).",
        ],
    );

    let config = base_config(input, output.clone());
    Pipeline::new(config).run().expect("pipeline run");

    let anonymized_path = fs::read_dir(&output)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| p.extension().map(|e| e == "cbl").unwrap_or(false))
        .expect("anonymized program file");
    let anonymized = fs::read_to_string(anonymized_path).unwrap();

    assert!(anonymized.contains("REDEFINES"));
    assert!(!anonymized.contains("WS-LEVEL2"));

    let mut level2_synthetics = Vec::new();
    for line in anonymized.lines() {
        if line.contains("REDEFINES") {
            let before_redefines = line.split("REDEFINES").next().unwrap();
            let name = before_redefines.split_whitespace().last().unwrap();
            level2_synthetics.push(name.trim_end_matches('.').to_string());
        }
    }
    assert_eq!(level2_synthetics.len(), 1);
}

#[test]
fn s5_circular_copy_dependency_is_fatal_and_writes_nothing() {
    let input = temp_dir("s5-in");
    let output = temp_dir("s5-out");
    write_source(&input, "A.cpy", &["       COPY B."]);
    write_source(&input, "B.cpy", &["       COPY A."]);

    let config = base_config(input, output.clone());
    let result = Pipeline::new(config).run();

    assert!(result.is_err());
    let entries: Vec<_> = fs::read_dir(&output).into_iter().flatten().collect();
    assert!(entries.is_empty());
}

#[test]
fn s6_italian_comment_is_translated_word_for_word() {
    let input = temp_dir("s6-in");
    let output = temp_dir("s6-out");
    write_source(
        &input,
        "PROG.cbl",
        &[
            "       IDENTIFICATION DIVISION.",
            "       PROGRAM-ID. PROG.",
            "      * GESTIONE POLIZZA - MASON - CRQ000002478171",
        ],
    );

    let config = base_config(input, output.clone());
    Pipeline::new(config).run().expect("pipeline run");

    let anonymized_path = fs::read_dir(&output)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| p.extension().map(|e| e == "cbl").unwrap_or(false))
        .expect("anonymized program file");
    let anonymized = fs::read_to_string(anonymized_path).unwrap();

    let comment_line = anonymized.lines().find(|l| l.starts_with("      *")).unwrap();
    assert!(comment_line.starts_with("      *"));
    assert!(comment_line.contains("MANAGEMENT"));
    assert!(comment_line.contains("POLICY"));
    assert!(!comment_line.contains("GESTIONE"));
    assert!(!comment_line.contains("POLIZZA"));
}

#[test]
fn mapping_is_stable_across_identical_runs() {
    let input = temp_dir("stable-in");
    write_source(
        &input,
        "PROG.cbl",
        &[
            "       IDENTIFICATION DIVISION.",
            "       PROGRAM-ID. PROG.",
            "       DATA DIVISION.",
            "       WORKING-STORAGE SECTION.",
            "       01 CUSTOMER-NAME PIC X(20).",
        ],
    );

    let output_a = temp_dir("stable-out-a");
    let output_b = temp_dir("stable-out-b");

    let mut config_a = base_config(input.clone(), output_a.clone());
    config_a.naming_scheme = NamingScheme::Animals;
    Pipeline::new(config_a).run().expect("first run");

    let mut config_b = base_config(input, output_b.clone());
    config_b.naming_scheme = NamingScheme::Animals;
    Pipeline::new(config_b).run().expect("second run");

    let mapping_a = fs::read_to_string(output_a.join("mappings.json")).unwrap();
    let mapping_b = fs::read_to_string(output_b.join("mappings.json")).unwrap();

    let without_timestamp = |s: &str| {
        s.lines()
            .filter(|l| !l.contains("generated_at"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    assert_eq!(without_timestamp(&mapping_a), without_timestamp(&mapping_b));
}

#[test]
fn dependency_order_places_copybooks_before_includers() {
    let input = temp_dir("order-in");
    write_source(&input, "CUSTREC.cpy", &["       05 WS-FIELD PIC X(1)."]);
    write_source(
        &input,
        "MAIN.cbl",
        &[
            "       IDENTIFICATION DIVISION.",
            "       PROGRAM-ID. MAIN.",
            "       DATA DIVISION.",
            "       WORKING-STORAGE SECTION.",
            "       COPY CUSTREC.",
        ],
    );
    let output = temp_dir("order-out");

    let config = base_config(input, output.clone());
    let report = Pipeline::new(config).run().expect("pipeline run");
    assert_eq!(report.total_files, 2);
}

#[test]
fn validate_only_mode_never_writes_output() {
    let input = temp_dir("validate-only-in");
    write_source(
        &input,
        "PROG.cbl",
        &["       IDENTIFICATION DIVISION.", "       PROGRAM-ID. PROG."],
    );
    let output = temp_dir("validate-only-out");

    let mut config = base_config(input, output.clone());
    config.validate_only = true;
    let report = Pipeline::new(config).run().expect("pipeline run");

    assert_eq!(report.total_files, 1);
    let entries: Vec<_> = fs::read_dir(&output).into_iter().flatten().collect();
    assert!(entries.is_empty());
}

#[test]
fn round_trip_identity_when_every_category_is_disabled() {
    let input = temp_dir("roundtrip-in");
    let source_lines = [
        "       IDENTIFICATION DIVISION.",
        "       PROGRAM-ID. TESTPROG.",
        "       DATA DIVISION.",
        "       WORKING-STORAGE SECTION.",
        "       01 WS-FIELD PIC X(10).",
    ];
    write_source(&input, "TESTPROG.cbl", &source_lines);
    let output = temp_dir("roundtrip-out");

    let mut config = base_config(input, output.clone());
    config.anonymize_programs = false;
    config.anonymize_copybooks = false;
    config.anonymize_data = false;
    config.anonymize_paragraphs = false;
    config.anonymize_sections = false;
    config.anonymize_comments = false;
    config.anonymize_literals = false;

    Pipeline::new(config).run().expect("pipeline run");

    let anonymized_path = fs::read_dir(&output)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| p.extension().map(|e| e == "cbl").unwrap_or(false))
        .expect("output program file");
    let anonymized = fs::read_to_string(anonymized_path).unwrap();
    let expected = format!("{}\n", source_lines.join("\n"));
    assert_eq!(anonymized, expected);
}
