//! Inline diagnostic block appended to a partially rendered artifact

use std::error::Error as _;
use std::fmt::Write;

/// Formats the block written after partial output when evaluation fails
///
/// Layout: `"\n\nError: \n" + summary + "\n Stacktrace: \n" + trace`.
pub fn diagnostic_block(err: &minijinja::Error) -> String {
    format!("\n\nError: \n{}\n Stacktrace: \n{}", err, trace(err))
}

/// Full trace of an evaluation error
///
/// Lists the error kind and location, every cause in the source chain, then
/// the template excerpt and referenced variables captured by the runtime.
pub fn trace(err: &minijinja::Error) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:?}: {}",
        err.kind(),
        err.detail().unwrap_or("no detail")
    );
    if let (Some(name), Some(line)) = (err.name(), err.line()) {
        let _ = writeln!(out, "    at {name}:{line}");
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(out, "caused by: {cause}");
        source = cause.source();
    }

    let _ = write!(out, "{}", err.display_debug_info());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::{Environment, ErrorKind};

    #[test]
    fn test_block_layout() {
        let err = minijinja::Error::new(ErrorKind::InvalidOperation, "lookup failed");
        let block = diagnostic_block(&err);

        assert!(block.starts_with("\n\nError: \n"));
        assert!(block.contains("lookup failed"));
        assert!(block.contains("\n Stacktrace: \n"));
    }

    #[test]
    fn test_trace_includes_cause_chain() {
        let io = std::io::Error::other("disk unplugged");
        let err = minijinja::Error::new(ErrorKind::InvalidOperation, "helper failed").with_source(io);

        let trace = trace(&err);
        assert!(trace.contains("InvalidOperation: helper failed"));
        assert!(trace.contains("caused by: disk unplugged"));
    }

    #[test]
    fn test_trace_includes_location() {
        let mut env = Environment::new();
        env.set_debug(true);
        let err = env
            .render_str("line one\n{{ 1 / 0 }}", ())
            .unwrap_err();

        let trace = trace(&err);
        assert!(trace.contains("at <string>:2"));
    }
}
