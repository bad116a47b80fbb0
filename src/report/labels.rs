use std::collections::BTreeMap;

/// Human-readable step descriptions keyed by test case and step index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepLabels {
    cases: BTreeMap<String, BTreeMap<u32, String>>,
}

impl StepLabels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptions for the bundled TC001 and TC002 scenarios.
    pub fn builtin() -> Self {
        let mut labels = Self::new();
        for (index, label) in [
            "Navigate to careers page",
            "Search for job title \"Test\" (after search click)",
            "Verify multiple locations in results",
            "Open country filter",
            "Select Netherlands from filter",
            "Verify filtered results",
        ]
        .into_iter()
        .enumerate()
        {
            labels.insert("TC001", index as u32 + 1, label);
        }
        for (index, label) in [
            "Navigate to careers page",
            "Open job search dropdown",
            "Select Sales from dropdown",
            "Verify Sales jobs page",
            "Verify Sales category is selected",
            "Verify job count matches category count",
            "Select country from filter",
            "Verify filtered job count matches country count",
        ]
        .into_iter()
        .enumerate()
        {
            labels.insert("TC002", index as u32 + 1, label);
        }
        labels
    }

    pub fn insert(&mut self, test_case: &str, index: u32, label: &str) {
        self.cases
            .entry(test_case.to_string())
            .or_default()
            .insert(index, label.to_string());
    }

    /// Add or override entries, e.g. from the config file.
    pub fn extend(&mut self, other: &BTreeMap<String, BTreeMap<u32, String>>) {
        for (test_case, steps) in other {
            for (index, label) in steps {
                self.insert(test_case, *index, label);
            }
        }
    }

    pub fn lookup(&self, test_case: &str, index: u32) -> Option<&str> {
        self.cases
            .get(test_case)
            .and_then(|steps| steps.get(&index))
            .map(String::as_str)
    }

    /// Table entry, or `Step N` for an unknown index.
    pub fn label(&self, test_case: &str, index: u32) -> String {
        self.lookup(test_case, index)
            .map(str::to_string)
            .unwrap_or_else(|| fallback_label(index))
    }
}

pub fn fallback_label(index: u32) -> String {
    format!("Step {}", index)
}
