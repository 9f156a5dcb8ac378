use std::backtrace::Backtrace;
use std::env;
use std::path::{Path, PathBuf};

use super::location::SourceLocation;
use super::stack_trace::{CallFrame, StackTrace};

pub(crate) const SOURCE_FILE: &str = file!();

const CRATE_NAME: &str = env!("CARGO_CRATE_NAME");
const MANIFEST_DIR: &str = env!("CARGO_MANIFEST_DIR");

/// Path fragments of toolchain, dependency and runtime-internal frames.
pub const DEFAULT_IGNORED: &[&str] = &[
    "/rustc/",
    "/library/std/src/",
    "/library/core/src/",
    "/library/alloc/src/",
    "/library/test/src/",
    "/.cargo/registry/",
    "/.cargo/git/",
    "node_modules",
    "node:internal",
];

/// Source files of the wrapping machinery itself, as `<package dir>/src/...`
/// suffixes. A frame whose resolved path ends with one of these is never
/// reported as a call site and is removed by [`Locator::scrub`].
pub fn own_source_files() -> Vec<PathBuf> {
    let package_dir = Path::new(MANIFEST_DIR)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_default();
    [
        SOURCE_FILE,
        crate::engine::SOURCE_FILE,
        crate::step::wrap::SOURCE_FILE,
        crate::step::context::SOURCE_FILE,
        crate::step::recorder::SOURCE_FILE,
        crate::step::tracing_reporter::SOURCE_FILE,
    ]
    .into_iter()
    .map(|file| package_dir.join(crate_relative(file)))
    .collect()
}

// `file!()` is workspace-relative, package-relative or absolute depending on
// how the crate was built. Everything from the last `src/` on is stable.
fn crate_relative(file: &str) -> &str {
    let normalized = file.rfind("src/").or_else(|| file.rfind("src\\"));
    normalized.map_or(file, |idx| &file[idx..])
}

/// Absolute form of a trace path. Backtraces print files under the working
/// directory as `./...`.
fn resolve(file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let relative = file.strip_prefix("./").unwrap_or(file);
    env::current_dir()
        .map(|cwd| cwd.join(relative))
        .unwrap_or_else(|_| PathBuf::from(relative))
}

/// Finds the first stack frame that belongs to the caller's code.
#[derive(Debug, Clone)]
pub struct Locator {
    ignored: Vec<String>,
    own_files: Vec<PathBuf>,
    /// Symbol prefix of this crate's functions, e.g. `stepmark::`.
    own_symbol: Option<String>,
    own_frame_depth: usize,
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}

impl Locator {
    pub fn new() -> Self {
        Self {
            ignored: DEFAULT_IGNORED.iter().map(|s| s.to_string()).collect(),
            own_files: own_source_files(),
            own_symbol: Some(format!("{CRATE_NAME}::")),
            own_frame_depth: 0,
        }
    }

    /// A locator that ignores nothing but the given fragments.
    pub fn with_ignored_only<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignored: patterns.into_iter().map(Into::into).collect(),
            own_files: Vec::new(),
            own_symbol: None,
            own_frame_depth: 0,
        }
    }

    pub fn with_ignored(mut self, pattern: impl Into<String>) -> Self {
        self.ignored.push(pattern.into());
        self
    }

    /// Number of leading frames that belong to the capture chain itself.
    pub fn with_own_frame_depth(mut self, depth: usize) -> Self {
        self.own_frame_depth = depth;
        self
    }

    pub fn own_frame_depth(&self) -> usize {
        self.own_frame_depth
    }

    /// Ignored path fragments, not counting the crate's own files.
    pub fn ignored(&self) -> impl Iterator<Item = &str> {
        self.ignored.iter().map(String::as_str)
    }

    pub fn is_ignored(&self, file: &str) -> bool {
        self.ignored().any(|pattern| file.contains(pattern)) || self.is_own_file(file)
    }

    fn is_own_file(&self, file: &str) -> bool {
        if self.own_files.is_empty() {
            return false;
        }
        let path = resolve(file);
        self.own_files.iter().any(|own| path.ends_with(own))
    }

    /// Whether `frame` belongs to the wrapping machinery, by symbol or file.
    pub fn is_own_frame(&self, frame: &CallFrame) -> bool {
        let by_symbol = self
            .own_symbol
            .as_deref()
            .zip(frame.function_name.as_deref())
            .is_some_and(|(prefix, name)| name.trim_start_matches('<').starts_with(prefix));
        by_symbol || frame.file().is_some_and(|file| self.is_own_file(file))
    }

    pub fn locate(&self, trace: &str) -> Option<SourceLocation> {
        StackTrace::parse(trace)
            .frames()
            .iter()
            .skip(self.own_frame_depth)
            .filter(|frame| !self.is_own_frame(frame))
            .filter_map(|frame| frame.location.as_ref())
            .find(|loc| !self.is_ignored(&loc.file))
            .cloned()
    }

    /// Capture the current thread's backtrace and locate the caller in it.
    pub fn capture(&self) -> Option<SourceLocation> {
        self.locate(&self.capture_trace())
    }

    /// The current thread's backtrace as text, this call's frames included.
    pub fn capture_trace(&self) -> String {
        Backtrace::force_capture().to_string()
    }

    /// Remove frames that point into the wrapping machinery. Every other
    /// line, including the error message, is kept as is.
    pub fn scrub(&self, trace: &str) -> String {
        let parsed = StackTrace::parse(trace);
        let dropped: Vec<usize> = parsed
            .frames()
            .iter()
            .filter(|frame| self.is_own_frame(frame))
            .flat_map(|frame| frame.lines.iter().copied())
            .collect();

        trace
            .lines()
            .enumerate()
            .filter(|(idx, _)| !dropped.contains(idx))
            .map(|(_, line)| line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_own_frames_before_matching() {
        let locator = Locator::with_ignored_only(["node_modules"]).with_own_frame_depth(1);
        let trace = "Error\n    at a (/src/first.ts:1:1)\n    at b (/src/second.ts:2:2)\n";
        assert_eq!(locator.locate(trace), SourceLocation::new("/src/second.ts", 2, 2));
    }

    #[test]
    fn crate_relative_keeps_the_src_tail() {
        assert_eq!(crate_relative("core/src/step/wrap.rs"), "src/step/wrap.rs");
        assert_eq!(crate_relative("src/step/wrap.rs"), "src/step/wrap.rs");
        assert_eq!(
            crate_relative("/home/u/.cargo/registry/src/index/stepmark-0.1.0/src/engine.rs"),
            "src/engine.rs"
        );
    }

    #[test]
    fn own_files_match_in_every_printed_form() {
        let locator = Locator::new();
        let absolute = Path::new(MANIFEST_DIR).join("src/step/wrap.rs");
        assert!(locator.is_ignored(&absolute.to_string_lossy()));

        let cwd = env::current_dir().expect("working directory");
        if let Ok(relative) = Path::new(MANIFEST_DIR).strip_prefix(&cwd) {
            let dotted = format!("./{}", relative.join("src/engine.rs").display());
            assert!(locator.is_ignored(&dotted), "{dotted}");
        }

        assert!(!locator.is_ignored("./tests/login_tests.rs"));
        assert!(!locator.is_ignored("/work/other/src/step/wrap.rs"));
    }

    #[test]
    fn own_symbols_are_own_frames() {
        let locator = Locator::new();
        let frame = |name: &str| CallFrame {
            function_name: Some(name.to_string()),
            location: None,
            lines: vec![0],
        };
        assert!(locator.is_own_frame(&frame("stepmark::step::wrap::Wrapped<R,F>::call")));
        assert!(locator.is_own_frame(&frame(
            "<stepmark::step::recorder::Recorder as stepmark::step::StepReporter>::report_step"
        )));
        assert!(!locator.is_own_frame(&frame("wrap_tests::login::{{closure}}")));
        assert!(!Locator::with_ignored_only(["x"]).is_own_frame(&frame("stepmark::engine::Engine::wrap")));
    }
}
