use once_cell::sync::Lazy;
use regex::Regex;

use super::location::SourceLocation;

// `at name (file:line:col)` or `at file:line:col`
static AT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*at\s+(?:(.+?)\s+\()?(.+?):(\d+):(\d+)\)?\s*$").expect("frame pattern")
});
// Rust backtrace frame header: `  12: crate::module::function`
static RUST_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+):\s+(.+?)\s*$").expect("backtrace header pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFrame {
    pub function_name: Option<String>,
    pub location: Option<SourceLocation>,
    /// Indices of the trace lines this frame was parsed from.
    pub lines: Vec<usize>,
}

impl CallFrame {
    pub fn file(&self) -> Option<&str> {
        self.location.as_ref().map(|loc| loc.file.as_str())
    }
}

/// Ordered frames of a captured stack trace, innermost first.
#[derive(Debug, Clone, Default)]
pub struct StackTrace {
    frames: Vec<CallFrame>,
}

impl StackTrace {
    /// Parse V8-style `at ...` lines and Rust `std::backtrace` output.
    /// Lines that are neither (such as the leading error message) are skipped.
    pub fn parse(trace: &str) -> Self {
        let mut frames: Vec<CallFrame> = Vec::new();
        // A Rust header waiting for its optional `at` line.
        let mut pending: Option<CallFrame> = None;
        let mut in_backtrace = false;

        for (idx, line) in trace.lines().enumerate() {
            if let Some(caps) = RUST_HEADER.captures(line) {
                in_backtrace = true;
                frames.extend(pending.take());
                pending = Some(CallFrame {
                    function_name: Some(caps[2].to_string()),
                    location: None,
                    lines: vec![idx],
                });
                continue;
            }

            let trimmed = line.trim_start();
            if !trimmed.starts_with("at ") {
                // Inlined symbols are printed indented, without an index.
                if in_backtrace && !trimmed.is_empty() && trimmed.len() < line.len() {
                    frames.extend(pending.take());
                    pending = Some(CallFrame {
                        function_name: Some(trimmed.trim_end().to_string()),
                        location: None,
                        lines: vec![idx],
                    });
                }
                continue;
            }

            let (name, location) = parse_at_line(line);
            match pending.take() {
                Some(mut header) => {
                    header.location = location;
                    header.lines.push(idx);
                    frames.push(header);
                }
                None => frames.push(CallFrame {
                    function_name: name,
                    location,
                    lines: vec![idx],
                }),
            }
        }
        frames.extend(pending);

        Self { frames }
    }

    pub fn frames(&self) -> &[CallFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn format_trace(&self) -> String {
        let mut out = String::new();
        for frame in &self.frames {
            let name = frame.function_name.as_deref().unwrap_or("<anonymous>");
            match &frame.location {
                Some(loc) => out.push_str(&format!("    at {name} ({loc})\n")),
                None => out.push_str(&format!("    at {name}\n")),
            }
        }
        out
    }
}

fn parse_at_line(line: &str) -> (Option<String>, Option<SourceLocation>) {
    let Some(caps) = AT_LINE.captures(line) else {
        let name = line.trim_start().trim_start_matches("at ").trim();
        return ((!name.is_empty()).then(|| name.to_string()), None);
    };
    let name = caps.get(1).map(|m| m.as_str().to_string());
    let line_no = caps[3].parse::<u32>().ok();
    let column = caps[4].parse::<u32>().ok();
    let location = line_no
        .zip(column)
        .and_then(|(l, c)| SourceLocation::new(&caps[2], l, c));
    (name, location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_and_anonymous_v8_frames() {
        let trace = StackTrace::parse(
            "Error: boom\n    at LoginPage.login (/app/pages/login.ts:12:7)\n    at /app/tests/a.spec.ts:3:9\n",
        );
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.frames()[0].function_name.as_deref(), Some("LoginPage.login"));
        assert_eq!(trace.frames()[0].file(), Some("/app/pages/login.ts"));
        assert_eq!(trace.frames()[1].function_name, None);
        assert_eq!(
            trace.frames()[1].location,
            SourceLocation::new("/app/tests/a.spec.ts", 3, 9)
        );
    }

    #[test]
    fn pairs_rust_headers_with_their_location() {
        let trace = StackTrace::parse(
            "   0: std::backtrace::Backtrace::create\n             at /rustc/abc/library/std/src/backtrace.rs:331:13\n   1: <unknown>\n   2: login_tests::login\n             at ./tests/login_tests.rs:20:5\n",
        );
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.frames()[1].location, None);
        assert_eq!(trace.frames()[2].function_name.as_deref(), Some("login_tests::login"));
        assert_eq!(trace.frames()[2].lines, vec![3, 4]);
    }

    #[test]
    fn inlined_symbols_become_their_own_frames() {
        let trace = StackTrace::parse(
            "   4: app::outer\n             at ./src/outer.rs:9:5\n      app::inner\n             at ./src/inner.rs:3:1\n   5: main\n",
        );
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.frames()[1].function_name.as_deref(), Some("app::inner"));
        assert_eq!(trace.frames()[1].file(), Some("./src/inner.rs"));
        assert_eq!(trace.frames()[1].lines, vec![2, 3]);
    }

    #[test]
    fn frame_without_column_has_no_location() {
        let trace = StackTrace::parse("    at Promise.all (index 0)\n    at run (/a.js:4)\n");
        assert_eq!(trace.len(), 2);
        assert!(trace.frames().iter().all(|f| f.location.is_none()));
    }

    #[test]
    fn windows_paths_keep_their_drive() {
        let trace = StackTrace::parse("    at C:\\work\\spec.ts:8:2\n");
        assert_eq!(trace.frames()[0].file(), Some("C:\\work\\spec.ts"));
    }
}
