use anyhow::Result;
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::Path;

use scanner::{ScanEvent, TokenStream};

pub mod ast;
pub mod scanner;

/// Scan a script, echoing its tokens. Returns whether any error was reported.
pub fn run_file(path: &Path) -> Result<bool> {
    scan_file(path, &mut io::stdout().lock(), &mut io::stderr().lock())
}

/// Stream the file at `path` through the scanner into the given sinks.
pub fn scan_file(path: &Path, out: &mut impl Write, diagnostics: &mut impl Write) -> Result<bool> {
    let file = File::open(path)?;
    let had_error = run(TokenStream::from_reader(file), out, diagnostics)?;
    Ok(had_error)
}

pub fn run_prompt() -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        line.clear();
        // end of input
        if stdin.lock().read_line(&mut line)? == 0 {
            writeln!(stdout)?;
            return Ok(());
        }

        // each line starts with a clean error flag, so the result is dropped
        let source = line.trim_end_matches(['\n', '\r']).to_owned();
        run(TokenStream::spawn(source), &mut stdout, &mut io::stderr())?;
    }
}

/// Drain `events`, writing tokens to `out` and errors to `diagnostics`.
///
/// Errors never stop the run; the return value only says whether there were any.
pub fn run(
    events: impl IntoIterator<Item = ScanEvent>,
    out: &mut impl Write,
    diagnostics: &mut impl Write,
) -> io::Result<bool> {
    let mut had_error = false;
    for event in events {
        match event {
            Ok(token) => writeln!(out, "{token}")?,
            Err(e) => {
                writeln!(diagnostics, "{e}")?;
                had_error = true;
            }
        }
    }
    Ok(had_error)
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use super::{run, scan_file};
    use crate::lox::scanner::{Scanner, TokenStream};

    fn run_to_strings(source: &str) -> (bool, String, String) {
        let mut out = vec![];
        let mut diagnostics = vec![];
        let had_error = run(Scanner::new(source), &mut out, &mut diagnostics).unwrap();
        (
            had_error,
            String::from_utf8(out).unwrap(),
            String::from_utf8(diagnostics).unwrap(),
        )
    }

    #[test]
    fn test_run_clean_source() {
        let (had_error, out, diagnostics) = run_to_strings("print 1;");
        assert!(!had_error);
        assert_eq!(out, "Print print nil\nNumber 1 1\nSemicolon ; nil\nEof  nil\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_run_keeps_going_after_errors() {
        let (had_error, out, diagnostics) = run_to_strings("@ x\n\"open");
        assert!(had_error);
        assert_eq!(out, "Identifier x nil\nEof  nil\n");
        assert_eq!(
            diagnostics,
            "line: 1, error: Unexpected character: '@'\n\
             line: 2, error: string error: unterminated string\n"
        );
    }

    #[test]
    fn test_run_stream() {
        let mut out = vec![];
        let mut diagnostics = vec![];
        let had_error = run(
            TokenStream::spawn("a >= b".to_owned()),
            &mut out,
            &mut diagnostics,
        )
        .unwrap();
        assert!(!had_error);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Identifier a nil\nGreaterEqual >= nil\nIdentifier b nil\nEof  nil\n"
        );
    }

    #[test]
    fn test_scan_file() {
        let path = std::env::temp_dir().join(format!("loxfront-scan-file-{}.lox", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "var ok = 1;\n$").unwrap();
        drop(file);

        let mut out = vec![];
        let mut diagnostics = vec![];
        let had_error = scan_file(&path, &mut out, &mut diagnostics).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(had_error);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Var var nil\nIdentifier ok nil\nEqual = nil\nNumber 1 1\nSemicolon ; nil\nEof  nil\n"
        );
        assert_eq!(
            String::from_utf8(diagnostics).unwrap(),
            "line: 2, error: Unexpected character: '$'\n"
        );
    }

    #[test]
    fn test_scan_file_missing() {
        let mut out = vec![];
        let mut diagnostics = vec![];
        let missing = std::path::Path::new("/definitely/not/here.lox");
        assert!(scan_file(missing, &mut out, &mut diagnostics).is_err());
        assert!(out.is_empty());
        assert!(diagnostics.is_empty());
    }
}
