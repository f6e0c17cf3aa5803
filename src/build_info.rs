use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Sink for the human-readable lines a build shows to its user.
pub trait BuildListener: Send + Sync {
    fn println(&self, line: &str);
}

/// Forwards build output to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

impl BuildListener for TracingListener {
    fn println(&self, line: &str) {
        tracing::info!(target: "ftp_publish::build", "{}", line);
    }
}

/// Discards build output.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullListener;

impl BuildListener for NullListener {
    fn println(&self, _line: &str) {}
}

/// Context of the build a session is opened for.
#[derive(Clone)]
pub struct BuildInfo {
    build_id: String,
    workspace: PathBuf,
    verbose: bool,
    listener: Arc<dyn BuildListener>,
}

impl BuildInfo {
    pub fn new(build_id: impl Into<String>, workspace: impl Into<PathBuf>) -> Self {
        Self {
            build_id: build_id.into(),
            workspace: workspace.into(),
            verbose: false,
            listener: Arc::new(TracingListener),
        }
    }

    pub fn with_listener(mut self, listener: Arc<dyn BuildListener>) -> Self {
        self.listener = listener;
        self
    }

    /// Echo server replies to the listener.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn build_id(&self) -> &str {
        &self.build_id
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn println(&self, line: &str) {
        self.listener.println(line);
    }

    pub fn print_if_verbose(&self, line: &str) {
        if self.verbose {
            self.listener.println(line);
        }
    }
}

impl fmt::Debug for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildInfo")
            .field("build_id", &self.build_id)
            .field("workspace", &self.workspace)
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}
