use std::path::Path;

use careers_e2e::gherkin::model::{sanitize_filename, Keyword};
use careers_e2e::gherkin::parser::{load_features, parse_feature};

mod common;

use common::fixtures::{TC001_FEATURE, TC002_FEATURE};

// ============================================================================
// 1. Feature structure
// ============================================================================

#[test]
fn parses_feature_scenario_and_steps() {
    let feature = parse_feature(TC001_FEATURE, "tc001.feature").unwrap();

    assert_eq!(feature.name, "Career search");
    assert_eq!(feature.tags, vec!["careers"]);
    assert_eq!(feature.scenarios.len(), 1);

    let scenario = &feature.scenarios[0];
    assert_eq!(scenario.name, "Search for Test jobs and filter by Netherlands");
    assert_eq!(scenario.tags, vec!["TC001"]);
    assert_eq!(scenario.steps.len(), 6);
    assert_eq!(scenario.steps[0].keyword, Keyword::Given);
    assert_eq!(scenario.steps[0].text, "I navigate to the Just Eat Takeaway careers page");
    assert_eq!(scenario.steps[4].keyword, Keyword::And);
    assert_eq!(scenario.steps[1].text, "I search for job title \"Test\"");
}

#[test]
fn records_line_numbers() {
    let feature = parse_feature(TC002_FEATURE, "tc002.feature").unwrap();
    let scenario = &feature.scenarios[0];
    assert_eq!(scenario.steps[0].line, 5);
    assert_eq!(scenario.steps[7].line, 12);
}

#[test]
fn collects_description_and_comments() {
    let source = "\
# a comment before the feature
Feature: Described
  As a job seeker
  I want results

  # comment between sections
  Scenario: One
    Given I open the country filter
";
    let feature = parse_feature(source, "described.feature").unwrap();
    assert!(feature.description.contains("As a job seeker"));
    assert!(feature.description.contains("I want results"));
    assert_eq!(feature.scenarios[0].steps.len(), 1);
}

#[test]
fn accepts_scenario_description() {
    let source = "\
Feature: F
  Scenario: S
    A free-text scenario description.
    Given I open the country filter
";
    let feature = parse_feature(source, "scenario_description.feature").unwrap();
    let scenario = &feature.scenarios[0];
    assert_eq!(scenario.steps.len(), 1);
    assert_eq!(scenario.steps[0].text, "I open the country filter");
}

#[test]
fn effective_tags_append_feature_tags() {
    let source = "@careers @smoke\nFeature: F\n  @TC003 @smoke\n  Scenario: S\n    Given x\n";
    let feature = parse_feature(source, "tags.feature").unwrap();
    assert_eq!(
        feature.scenarios[0].effective_tags(&feature),
        vec!["TC003", "smoke", "careers"]
    );
}

#[test]
fn background_steps_are_kept_apart() {
    let source = "\
Feature: With background
  Background:
    Given I navigate to the Just Eat Takeaway careers page

  Scenario: First
    When I open the country filter

  Example: Second
    * I open the country filter
";
    let feature = parse_feature(source, "bg.feature").unwrap();
    assert_eq!(feature.background.len(), 1);
    assert_eq!(feature.scenarios.len(), 2);
    assert_eq!(feature.scenarios[1].steps[0].keyword, Keyword::Star);
}

// ============================================================================
// 2. Rejected input
// ============================================================================

#[test]
fn rejects_scenario_outline() {
    let source = "\
Feature: F
  Scenario Outline: O
    Given I wait <n> seconds

    Examples:
      | n |
      | 1 |
";
    let err = parse_feature(source, "outline.feature").unwrap_err();
    assert_eq!(err.line, Some(2));
    assert!(err.message.contains("Scenario Outline"));
    assert!(err.to_string().starts_with("outline.feature:2: "));
}

#[test]
fn rejects_data_tables_at_their_step() {
    let source = "Feature: F\n  Scenario: S\n    Given x\n      | a | b |\n";
    let err = parse_feature(source, "table.feature").unwrap_err();
    assert_eq!(err.line, Some(3));
    assert!(err.message.contains("data tables"));
}

#[test]
fn grammar_errors_name_the_file() {
    let err = parse_feature("Scenario: S\n  Given x\n", "nofeature.feature").unwrap_err();
    assert_eq!(err.line, None);
    assert!(err.to_string().starts_with("nofeature.feature: "));
}

#[test]
fn rejects_missing_feature_line() {
    assert!(parse_feature("", "empty.feature").is_err());
    assert!(parse_feature("Scenario: S\n", "nofeature.feature").is_err());
}

// ============================================================================
// 3. Test case identifiers
// ============================================================================

#[test]
fn test_case_id_prefers_scenario_tag() {
    let feature = parse_feature(TC002_FEATURE, "tc002.feature").unwrap();
    assert_eq!(feature.scenarios[0].test_case_id(&feature), "TC002");
}

#[test]
fn test_case_id_falls_back_to_feature_tag_then_name() {
    let source = "@TC009\nFeature: F\n  @smoke\n  Scenario: Tagged at feature level\n    Given x\n";
    let feature = parse_feature(source, "f.feature").unwrap();
    assert_eq!(feature.scenarios[0].test_case_id(&feature), "TC009");

    let source = "Feature: F\n  @smoke\n  Scenario: No Id Here!\n    Given x\n";
    let feature = parse_feature(source, "f.feature").unwrap();
    assert_eq!(feature.scenarios[0].test_case_id(&feature), "no_id_here_");
}

#[test]
fn has_tag_checks_both_levels() {
    let feature = parse_feature(TC001_FEATURE, "tc001.feature").unwrap();
    let scenario = &feature.scenarios[0];
    assert!(scenario.has_tag(&feature, "@TC001"));
    assert!(scenario.has_tag(&feature, "careers"));
    assert!(!scenario.has_tag(&feature, "TC002"));
}

#[test]
fn sanitize_filename_replaces_separators() {
    assert_eq!(sanitize_filename("Sales / Germany"), "sales___germany");
    assert_eq!(sanitize_filename("tc-01_ok"), "tc-01_ok");
}

// ============================================================================
// 4. Loading from disk
// ============================================================================

#[test]
fn loads_directory_sorted_by_file_name() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b_sales.feature"), TC002_FEATURE).unwrap();
    std::fs::write(dir.path().join("a_search.feature"), TC001_FEATURE).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a feature").unwrap();

    let features = load_features(dir.path()).unwrap();
    assert_eq!(features.len(), 2);
    assert_eq!(features[0].name, "Career search");
    assert_eq!(features[1].name, "Sales job filtering");
    assert_eq!(
        features[0].path.as_deref(),
        Some(dir.path().join("a_search.feature").as_path())
    );
}

#[test]
fn bundled_features_parse() {
    let features = load_features(Path::new("features")).unwrap();
    let ids: Vec<String> = features
        .iter()
        .flat_map(|f| f.scenarios.iter().map(move |s| s.test_case_id(f)))
        .collect();
    assert_eq!(ids, vec!["TC001", "TC002"]);
}

#[test]
fn missing_path_is_an_io_error() {
    let err = load_features(Path::new("does/not/exist.feature")).unwrap_err();
    assert!(err.to_string().contains("does/not/exist.feature"));
}
