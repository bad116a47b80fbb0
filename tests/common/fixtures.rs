//! A scripted careers site that lets both bundled scenarios pass.

use careers_e2e::pages::careers::{CAREERS_URL, EXPECTED_TITLE};

use super::fake_browser::{effect, FakeLauncher, FakeState};

pub const SEARCH_INPUT: &str = r#"input[placeholder="Search for job title"]"#;
pub const SEARCH_SUBMIT: &str = "#ph-search-backdrop";
pub const RESULT_ITEMS: &str = r#"div[data-widget="phw-search-results-v1"] div[data-ph-at-id="jobs-list"]"#;
pub const RESULT_LOCATIONS: &str =
    r#"div[data-widget="phw-search-results-v1"] [data-ph-at-id="job-location"] div[role="text"]"#;
pub const NETHERLANDS_FACET: &str =
    r#"input[data-ph-at-text="Netherlands"][data-ph-at-facetkey="facet-country"]"#;

pub const SALES_LINK: &str = r#"a[data-ph-at-data-text="Sales"][data-ph-at-id="category-link"]"#;
pub const SALES_CATEGORY: &str = r#"input[data-ph-at-text="Sales"][data-ph-at-facetkey="facet-category"]"#;
pub const GERMANY_FACET: &str = r#"input[data-ph-at-text="Germany"][data-ph-at-facetkey="facet-country"]"#;
pub const GERMANY_CHECKBOX: &str =
    r#"li[data-ph-at-id="facet-results-item"]:has(input[data-ph-at-text="Germany"]) span.checkbox"#;
pub const RESULT_COUNT: &str = r#"[data-ph-at-id="search-page-top-job-count"] .result-count"#;

pub const SEARCH_RESULTS_URL: &str = "https://careers.justeattakeaway.com/global/en/search-results?keywords=Test";
pub const SALES_URL: &str = "https://careers.justeattakeaway.com/global/en/c/sales-jobs";

/// Home page with a working search and country facet.
pub fn script_career_search(state: &mut FakeState) {
    state.title = format!("Home | {}", EXPECTED_TITLE);

    state.on_click.insert(
        SEARCH_SUBMIT.to_string(),
        effect(|s| {
            s.url = SEARCH_RESULTS_URL.to_string();
            s.counts.insert(RESULT_ITEMS.to_string(), 10);
            s.texts.insert(
                RESULT_LOCATIONS.to_string(),
                vec![
                    "Location : Amsterdam, Netherlands".into(),
                    "Location : London, United Kingdom".into(),
                    "Location : Berlin, Germany".into(),
                ],
            );
        }),
    );

    state.on_click.insert(
        NETHERLANDS_FACET.to_string(),
        effect(|s| {
            s.counts.insert(RESULT_ITEMS.to_string(), 3);
            s.texts.insert(
                RESULT_LOCATIONS.to_string(),
                vec![
                    "Location : Amsterdam, Netherlands".into(),
                    "Location : Enschede, Netherlands".into(),
                ],
            );
        }),
    );
}

/// Sales category landing page with consistent facet counts.
pub fn script_sales_filtering(state: &mut FakeState) {
    state.title = format!("Home | {}", EXPECTED_TITLE);

    state.on_click.insert(
        SALES_LINK.to_string(),
        effect(|s| {
            s.url = SALES_URL.to_string();
            s.checked.insert(SALES_CATEGORY.to_string());
            s.attributes.insert(
                (SALES_CATEGORY.to_string(), "aria-label".to_string()),
                "Sales 42".to_string(),
            );
            s.texts.insert(RESULT_COUNT.to_string(), vec!["42".into()]);
        }),
    );

    state.on_click.insert(
        GERMANY_CHECKBOX.to_string(),
        effect(|s| {
            s.attributes.insert(
                (GERMANY_FACET.to_string(), "aria-label".to_string()),
                "Germany (7)".to_string(),
            );
            s.texts.insert(RESULT_COUNT.to_string(), vec![" 7 jobs".into()]);
        }),
    );
}

/// Launcher whose pages behave like the live careers site.
pub fn careers_site() -> FakeLauncher {
    FakeLauncher::with(|s| {
        script_career_search(s);
        script_sales_filtering(s);
    })
}

pub fn careers_url() -> &'static str {
    CAREERS_URL
}

pub const TC001_FEATURE: &str = r#"@careers
Feature: Career search

  @TC001
  Scenario: Search for Test jobs and filter by Netherlands
    Given I navigate to the Just Eat Takeaway careers page
    When I search for job title "Test"
    Then I should see search results from multiple locations
    When I open the country filter
    And I select "Netherlands" from the country filter
    Then I should see that the results are filtered to show only Netherlands locations
"#;

pub const TC002_FEATURE: &str = r#"Feature: Sales job filtering

  @TC002
  Scenario: Filter Sales jobs by country
    Given I navigate to the Just Eat Takeaway careers page for Sales filtering
    When I click on the job search input field to open dropdown
    And I select "Sales" from the dropdown menu
    Then I should be on the Sales jobs page
    And I should verify that "Sales" category is selected
    And I should verify that the job count matches the category count
    When I select "Germany" from the country filter on Sales page
    Then I should verify that the filtered job count matches the "Germany" count
"#;
