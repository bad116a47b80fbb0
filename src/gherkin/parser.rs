use std::path::Path;

use ::gherkin::GherkinEnv;

use crate::error::{E2eError, ParseError};
use crate::gherkin::model::{Feature, Keyword, Scenario, Step};

/// Parse the text of one `.feature` file.
///
/// Grammar is handled by the `gherkin` crate; this layer rejects the
/// constructs the runner cannot execute and converts into `model` types.
/// `origin` is only used in error messages.
pub fn parse_feature(source: &str, origin: &str) -> Result<Feature, ParseError> {
    let mut text = source.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }

    let parsed = ::gherkin::Feature::parse(&text, GherkinEnv::default()).map_err(|e| ParseError {
        path: origin.to_string(),
        line: None,
        message: error_chain(&e),
    })?;

    convert_feature(parsed, origin)
}

fn convert_feature(parsed: ::gherkin::Feature, origin: &str) -> Result<Feature, ParseError> {
    let unsupported = |line: usize, message: String| ParseError {
        path: origin.to_string(),
        line: Some(line),
        message,
    };

    if let Some(rule) = parsed.rules.first() {
        return Err(unsupported(rule.position.line, "'Rule:' is not supported".into()));
    }

    let background = match parsed.background {
        Some(bg) => bg
            .steps
            .into_iter()
            .map(|s| convert_step(s, origin))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let mut scenarios = Vec::with_capacity(parsed.scenarios.len());
    for scenario in parsed.scenarios {
        let line = scenario.position.line;
        if !scenario.examples.is_empty() || scenario.keyword.contains("Outline") || scenario.keyword.contains("Template")
        {
            return Err(unsupported(line, "'Scenario Outline' is not supported".into()));
        }
        scenarios.push(Scenario {
            name: scenario.name.trim().to_string(),
            tags: normalize_tags(scenario.tags),
            line,
            steps: scenario
                .steps
                .into_iter()
                .map(|s| convert_step(s, origin))
                .collect::<Result<Vec<_>, _>>()?,
        });
    }

    Ok(Feature {
        name: parsed.name.trim().to_string(),
        description: parsed.description.as_deref().map(normalize_description).unwrap_or_default(),
        tags: normalize_tags(parsed.tags),
        background,
        scenarios,
        path: None,
    })
}

fn convert_step(step: ::gherkin::Step, origin: &str) -> Result<Step, ParseError> {
    let line = step.position.line;
    if step.table.is_some() || step.docstring.is_some() {
        return Err(ParseError {
            path: origin.to_string(),
            line: Some(line),
            message: "data tables and doc strings are not supported".into(),
        });
    }

    let keyword = Keyword::parse(&step.keyword).unwrap_or(match step.ty {
        ::gherkin::StepType::Given => Keyword::Given,
        ::gherkin::StepType::When => Keyword::When,
        ::gherkin::StepType::Then => Keyword::Then,
    });

    Ok(Step {
        keyword,
        text: step.value.trim().to_string(),
        line,
    })
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim_start_matches('@').to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn normalize_description(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The error's message followed by its sources; the innermost carries the
/// grammar position.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

/// Load one `.feature` file, or every `.feature` file in a directory
/// sorted by file name.
pub fn load_features(path: &Path) -> Result<Vec<Feature>, E2eError> {
    let metadata = std::fs::metadata(path).map_err(|e| E2eError::io(path, e))?;

    let mut files = Vec::new();
    if metadata.is_dir() {
        for entry in std::fs::read_dir(path).map_err(|e| E2eError::io(path, e))? {
            let entry = entry.map_err(|e| E2eError::io(path, e))?;
            let p = entry.path();
            if p.extension().is_some_and(|e| e == "feature") {
                files.push(p);
            }
        }
        files.sort();
    } else {
        files.push(path.to_path_buf());
    }

    let mut features = Vec::with_capacity(files.len());
    for file in files {
        let source = std::fs::read_to_string(&file).map_err(|e| E2eError::io(&file, e))?;
        let mut feature = parse_feature(&source, &file.display().to_string())?;
        feature.path = Some(file);
        features.push(feature);
    }
    Ok(features)
}
