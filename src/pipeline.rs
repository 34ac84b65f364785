//! Batch processing: source file in, one JSON file per node plus an aggregate out.

use crate::error::{NodeError, SourceError};
use crate::locate::locate_nodes;
use crate::manifest::{ClassificationRequest, Classifier};
use crate::node::{NodeNormalizer, NormalizedNode};
use ahash::AHashSet;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{info, warn};

/// Settings for one run. Passed explicitly to [`Pipeline::new`].
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// The node library to read.
    pub source: PathBuf,
    /// Directory receiving one file per node.
    pub output_dir: PathBuf,
    /// File receiving the array of all normalized nodes.
    pub aggregate_path: PathBuf,
    /// Remove `output_dir` before writing.
    pub clear_output: bool,
    /// Pause after each successful classification call.
    pub pacing: Duration,
    /// Parameters included in a classification request.
    pub max_prompt_parameters: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("raw/n8n_nodes_library.json"),
            output_dir: PathBuf::from("output"),
            aggregate_path: PathBuf::from("n8n_nodes_master.json"),
            clear_output: true,
            pacing: Duration::from_secs(4),
            max_prompt_parameters: 15,
        }
    }
}

impl RunConfig {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_aggregate_path(mut self, aggregate_path: impl Into<PathBuf>) -> Self {
        self.aggregate_path = aggregate_path.into();
        self
    }

    pub fn with_clear_output(mut self, clear_output: bool) -> Self {
        self.clear_output = clear_output;
        self
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_max_prompt_parameters(mut self, max_prompt_parameters: usize) -> Self {
        self.max_prompt_parameters = max_prompt_parameters;
        self
    }
}

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Node records found in the source.
    pub discovered: usize,
    /// Per-node files written.
    pub written: usize,
    /// Records skipped because of a per-node error.
    pub failed: usize,
    /// Nodes that received a manifest.
    pub enriched: usize,
    pub files: Vec<PathBuf>,
    /// `None` when nothing was found and no aggregate was written.
    pub aggregate: Option<PathBuf>,
}

/// Runs the whole normalization batch.
pub struct Pipeline {
    config: RunConfig,
    normalizer: NodeNormalizer,
    classifier: Option<Box<dyn Classifier>>,
}

impl Pipeline {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            normalizer: NodeNormalizer::new(),
            classifier: None,
        }
    }

    pub fn with_normalizer(mut self, normalizer: NodeNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Enables manifest enrichment through `classifier`.
    pub fn with_classifier(mut self, classifier: Box<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Reads the configured source and processes it.
    pub fn run(&self) -> Result<RunSummary, SourceError> {
        let document = load_source(&self.config.source)?;
        self.process(&document)
    }

    /// Processes an already decoded source document.
    ///
    /// A document without recognizable nodes produces no files at all. Otherwise the
    /// output directory is prepared, every node is attempted, and failures are counted
    /// rather than propagated.
    pub fn process(&self, document: &Value) -> Result<RunSummary, SourceError> {
        let raw_nodes = locate_nodes(document);
        let mut summary = RunSummary {
            discovered: raw_nodes.len(),
            ..RunSummary::default()
        };
        if raw_nodes.is_empty() {
            warn!("No nodes were found in the source document");
            return Ok(summary);
        }

        self.prepare_output_dir()?;

        let mut used_names = AHashSet::new();
        let mut aggregate = Vec::with_capacity(raw_nodes.len());
        for (index, raw) in raw_nodes.into_iter().enumerate() {
            let position = index + 1;
            let node = self.normalizer.normalize(raw);
            let node = self.enrich(node, &mut summary);

            match self.write_node(&node, position, &mut used_names) {
                Ok(path) => {
                    info!(
                        "[{}/{}] {} -> {}",
                        position,
                        summary.discovered,
                        node.display_name(),
                        path.display()
                    );
                    summary.files.push(path);
                    aggregate.push(node);
                }
                Err(e) => {
                    warn!("Failed to process node index {}: {}", position, e);
                    summary.failed += 1;
                }
            }
        }
        summary.written = summary.files.len();

        write_json(&self.config.aggregate_path, &aggregate).map_err(|message| {
            SourceError::Output {
                path: self.config.aggregate_path.display().to_string(),
                message,
            }
        })?;
        summary.aggregate = Some(self.config.aggregate_path.clone());

        info!(
            "Processed {} of {} nodes. Output written to {} and {}",
            summary.written,
            summary.discovered,
            self.config.output_dir.display(),
            self.config.aggregate_path.display()
        );
        Ok(summary)
    }

    fn enrich(&self, node: NormalizedNode, summary: &mut RunSummary) -> NormalizedNode {
        let Some(classifier) = &self.classifier else {
            return node;
        };

        let request = ClassificationRequest::from_node(&node, self.config.max_prompt_parameters);
        match classifier.classify(&request) {
            Ok(manifest) => {
                summary.enriched += 1;
                if !self.config.pacing.is_zero() {
                    std::thread::sleep(self.config.pacing);
                }
                node.with_manifest(manifest)
            }
            Err(e) => {
                warn!("Skipping manifest for '{}': {}", node.display_name(), e);
                node
            }
        }
    }

    fn prepare_output_dir(&self) -> Result<(), SourceError> {
        let dir = &self.config.output_dir;
        let output_error = |message: String| SourceError::Output {
            path: dir.display().to_string(),
            message,
        };

        if self.config.clear_output && dir.exists() {
            ensure_clearable(
                dir,
                &[self.config.source.as_path(), self.config.aggregate_path.as_path()],
            )
                .map_err(output_error)?;
            fs::remove_dir_all(dir).map_err(|e| output_error(e.to_string()))?;
        }
        fs::create_dir_all(dir).map_err(|e| output_error(e.to_string()))
    }

    fn write_node(
        &self,
        node: &NormalizedNode,
        position: usize,
        used_names: &mut AHashSet<String>,
    ) -> Result<PathBuf, NodeError> {
        let base = match node.display_name() {
            "" => format!("node_{}", position),
            name => sanitize_filename(name),
        };
        let file_name = unique_name(&base, used_names);
        let path = self.config.output_dir.join(format!("{}.json", file_name));

        let body = serde_json::to_string_pretty(node).map_err(|e| NodeError::Serialize {
            node: node.display_name().to_string(),
            message: e.to_string(),
        })?;
        write_atomic(&path, body.as_bytes()).map_err(|message| NodeError::Write {
            path: path.display().to_string(),
            message,
        })?;
        Ok(path)
    }
}

/// Normalizes every node of `document` without touching the filesystem.
pub fn normalize_document(document: &Value) -> Vec<NormalizedNode> {
    let normalizer = NodeNormalizer::new();
    locate_nodes(document)
        .into_iter()
        .map(|raw| normalizer.normalize(raw))
        .collect()
}

/// Reads and decodes the source document.
pub fn load_source(path: &Path) -> Result<Value, SourceError> {
    let text = fs::read_to_string(path).map_err(|e| SourceError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| SourceError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Refuses to clear `dir` when it resolves to a filesystem root, the working directory
/// or one of its ancestors, or a directory holding any of the `protected` paths.
fn ensure_clearable(dir: &Path, protected: &[&Path]) -> Result<(), String> {
    let dir = fs::canonicalize(dir).map_err(|e| e.to_string())?;
    if dir.parent().is_none() {
        return Err("refusing to clear a filesystem root".to_string());
    }
    let cwd = std::env::current_dir().and_then(fs::canonicalize).map_err(|e| e.to_string())?;
    if cwd.starts_with(&dir) {
        return Err("refusing to clear the working directory or one of its ancestors".to_string());
    }
    for path in protected {
        if resolve_existing(path).is_some_and(|resolved| resolved.starts_with(&dir)) {
            return Err(format!(
                "refusing to clear a directory containing '{}'",
                path.display()
            ));
        }
    }
    Ok(())
}

/// Canonical form of `path`, or of its parent directory when the file itself does not
/// exist yet.
fn resolve_existing(path: &Path) -> Option<PathBuf> {
    fs::canonicalize(path).ok().or_else(|| {
        let parent = path.parent().filter(|p| !p.as_os_str().is_empty())?;
        let parent = fs::canonicalize(parent).ok()?;
        Some(match path.file_name() {
            Some(name) => parent.join(name),
            None => parent,
        })
    })
}

fn unsafe_filename_re() -> &'static Regex {
    static UNSAFE_RE: OnceLock<Regex> = OnceLock::new();
    UNSAFE_RE.get_or_init(|| Regex::new(r#"[\\/:*?"<>|]+"#).expect("valid filename regex"))
}

/// Replaces runs of filesystem-unsafe characters and each space with `_`.
pub fn sanitize_filename(name: &str) -> String {
    if name.is_empty() {
        return "unnamed_node".to_string();
    }
    unsafe_filename_re().replace_all(name, "_").replace(' ', "_")
}

fn unique_name(base: &str, used_names: &mut AHashSet<String>) -> String {
    let mut candidate = base.to_string();
    let mut suffix = 2;
    while !used_names.insert(candidate.to_lowercase()) {
        candidate = format!("{}_{}", base, suffix);
        suffix += 1;
    }
    candidate
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), String> {
    let body = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    write_atomic(path, body.as_bytes())
}

/// Writes to a sibling temporary file, then renames it into place.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), String> {
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);
    fs::write(&temp, bytes).map_err(|e| e.to_string())?;
    fs::rename(&temp, path).map_err(|e| {
        let _ = fs::remove_file(&temp);
        e.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("HTTP Request"), "HTTP_Request");
        assert_eq!(sanitize_filename("a/b\\c:d"), "a_b_c_d");
        assert_eq!(sanitize_filename("what?<>|"), "what_");
        assert_eq!(sanitize_filename(""), "unnamed_node");
    }

    #[test]
    fn test_working_directory_is_never_cleared() {
        assert!(ensure_clearable(Path::new("."), &[]).is_err());
        assert!(ensure_clearable(Path::new(".."), &[]).is_err());
        assert!(ensure_clearable(Path::new("/"), &[]).is_err());
    }

    #[test]
    fn test_unique_name_adds_suffix() {
        let mut used = AHashSet::new();
        assert_eq!(unique_name("Slack", &mut used), "Slack");
        assert_eq!(unique_name("Slack", &mut used), "Slack_2");
        assert_eq!(unique_name("slack", &mut used), "slack_3");
    }
}
