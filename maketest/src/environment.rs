//! Filesystem locations and stage commands for the test pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Process-wide filesystem locations, fixed for a whole campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    /// Root under which each test gets its own directory.
    pub tests_directory: PathBuf,
    /// Test generator sources.
    pub generate_directory: PathBuf,
    /// Build workspace for generated tests.
    pub workspace_directory: PathBuf,
    /// External runtime installation used to run tests.
    pub runtime_directory: PathBuf,
    /// Post-processing tool sources.
    pub analysis_directory: PathBuf,
    /// Where post-processed results land.
    pub results_directory: PathBuf,
    /// Directory of the runtime log truncated before each run.
    pub logfile_directory: PathBuf,
    /// File name of the runtime log inside `logfile_directory`.
    pub logfile_name: String,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            tests_directory: PathBuf::from("tests"),
            generate_directory: PathBuf::from("generator"),
            workspace_directory: PathBuf::from("workspace"),
            runtime_directory: PathBuf::from("runtime"),
            analysis_directory: PathBuf::from("postprocess"),
            results_directory: PathBuf::from("results"),
            logfile_directory: PathBuf::from("/var/log"),
            logfile_name: "ros.log".to_owned(),
        }
    }
}

impl Environment {
    /// Full path of the runtime log file.
    #[must_use]
    pub fn logfile(&self) -> PathBuf {
        self.logfile_directory.join(&self.logfile_name)
    }
}

/// An external program with its argument template.
///
/// Arguments may contain `{name}`, `{test_dir}`, `{rules}`, `{timing}`,
/// `{log}`, `{results}` and `{workspace}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Executable, resolved through `PATH`.
    pub program: String,
    /// Argument templates.
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Substitutes every placeholder in the arguments.
    #[must_use]
    pub fn expand(&self, vars: &[(&str, String)]) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                vars.iter().fold(arg.clone(), |acc, (key, value)| {
                    acc.replace(&format!("{{{key}}}"), value)
                })
            })
            .collect()
    }
}

/// Commands for each external pipeline stage. Unset stages are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Toolchain {
    /// Writes the test sources from `rules.json`; runs in the generator directory.
    pub generate: Option<CommandSpec>,
    /// Builds the generated test; runs in the workspace directory.
    pub build: Option<CommandSpec>,
    /// Executes the test; runs in the runtime directory.
    pub run: Option<CommandSpec>,
    /// Analyzes the run log; runs in the analysis directory.
    pub postprocess: Option<CommandSpec>,
}
