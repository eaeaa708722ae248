use crate::step::{Delete, Entry, ResourceQuery, Step, Write};
use crate::ClientError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// An immutable, ordered sequence of steps.
///
/// Cloning a scenario shares the underlying steps, so a session replaying it
/// refers to the same sequence as the set it was selected from.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    name: Option<String>,
    steps: Arc<[Step]>,
}

impl Scenario {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            name: None,
            steps: steps.into(),
        }
    }

    pub fn named(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: Some(name.into()),
            steps: steps.into(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Whether both values share the same step sequence.
    pub fn ptr_eq(&self, other: &Scenario) -> bool {
        Arc::ptr_eq(&self.steps, &other.steps)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} steps)",
            self.name().unwrap_or("unnamed"),
            self.len()
        )
    }
}

/// Scenario as it appears in a scenario file
#[derive(Debug, Deserialize, Serialize)]
struct ScenarioDef {
    #[serde(default)]
    name: Option<String>,
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScenarioFile {
    Bare(Vec<Vec<Step>>),
    Named { scenarios: Vec<ScenarioDef> },
}

impl From<ScenarioFile> for ScenarioSet {
    fn from(file: ScenarioFile) -> Self {
        let scenarios = match file {
            ScenarioFile::Bare(lists) => lists.into_iter().map(Scenario::new).collect(),
            ScenarioFile::Named { scenarios } => scenarios
                .into_iter()
                .map(|def| Scenario {
                    name: def.name,
                    steps: def.steps.into(),
                })
                .collect(),
        };
        ScenarioSet { scenarios }
    }
}

/// Ordered scenarios, addressed from the console by 1-based index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioSet {
    scenarios: Vec<Scenario>,
}

impl ScenarioSet {
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self { scenarios }
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Look up a scenario by its 1-based index.
    pub fn get(&self, index: i64) -> Option<&Scenario> {
        if index < 1 {
            return None;
        }
        self.scenarios.get(usize::try_from(index - 1).ok()?)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    /// Parse a JSON scenario document: either `[[step, ...], ...]` or
    /// `{"scenarios": [{"name": ..., "steps": [...]}]}`.
    pub fn from_json(content: &str) -> Result<Self, ClientError> {
        let file: ScenarioFile = serde_json::from_str(content)
            .map_err(|e| ClientError::ScenarioFile(format!("invalid JSON scenarios: {}", e)))?;
        Ok(file.into())
    }

    /// Parse a TOML scenario document made of `[[scenarios]]` tables.
    pub fn from_toml(content: &str) -> Result<Self, ClientError> {
        #[derive(Deserialize)]
        struct TomlFile {
            scenarios: Vec<ScenarioDef>,
        }
        let file: TomlFile = toml::from_str(content)
            .map_err(|e| ClientError::ScenarioFile(format!("invalid TOML scenarios: {}", e)))?;
        Ok(ScenarioFile::Named {
            scenarios: file.scenarios,
        }
        .into())
    }

    /// Load scenarios from a file; `.toml` files are TOML, anything else JSON.
    pub fn load(path: &Path) -> Result<Self, ClientError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ClientError::ScenarioFile(format!("failed to read {:?}: {}", path, e))
        })?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    /// The spreadsheet demo: cells written into `cells`, formulas read back
    /// through the `computed` resource.
    pub fn sheet_demo() -> Self {
        let cells = |entries: Vec<(&str, &str)>| {
            Step::Write(vec![Write {
                collection: "cells".to_string(),
                entries: entries
                    .into_iter()
                    .map(|(key, value)| Entry::new(key, vec![json!(value)]))
                    .collect(),
            }])
        };
        let steps = vec![
            Step::Request(ResourceQuery::new("computed")),
            cells(vec![("A1", "23"), ("A2", "2")]),
            cells(vec![("A3", "=A1 + A2")]),
            cells(vec![("A1", "5")]),
            cells(vec![("A4", "=A3 * A2")]),
            Step::Delete(vec![Delete {
                collection: "cells".to_string(),
                keys: vec![json!("A3")],
            }]),
        ];
        Self::new(vec![Scenario::named("spreadsheet", steps)])
    }
}
