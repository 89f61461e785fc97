//! Layout checks over the crate's own sources

use std::fs;
use std::path::{Path, PathBuf};

/// rustfmt's default `max_width`
const MAX_WIDTH: usize = 100;

fn rust_files(dir: &Path, found: &mut Vec<PathBuf>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            rust_files(&path, found);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            found.push(path);
        }
    }
}

#[test]
fn test_source_lines_fit_in_max_width() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut files = Vec::new();
    rust_files(&root.join("src"), &mut files);
    rust_files(&root.join("tests"), &mut files);
    assert!(!files.is_empty());

    let mut too_long = Vec::new();
    for file in &files {
        let source = fs::read_to_string(file).unwrap();
        for (number, line) in source.lines().enumerate() {
            let width = line.chars().count();
            if width > MAX_WIDTH {
                too_long.push(format!("{}:{} ({width})", file.display(), number + 1));
            }
        }
    }

    assert!(too_long.is_empty(), "lines over {MAX_WIDTH} columns: {too_long:#?}");
}

#[test]
fn test_await_is_not_split_from_its_call() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut files = Vec::new();
    rust_files(&root.join("src"), &mut files);

    let mut split = Vec::new();
    for file in &files {
        let source = fs::read_to_string(file).unwrap();
        let lines: Vec<&str> = source.lines().collect();
        for (index, pair) in lines.windows(2).enumerate() {
            // rustfmt keeps `.await` on the line of a call that fits with it
            let next = pair[1].trim();
            let call = pair[0].trim_end();
            let starts_expression = !call.trim_start().starts_with(&['.', ')', '}'][..]);
            if next.starts_with(".await")
                && starts_expression
                && call.ends_with(')')
                && call.chars().count() + next.chars().count() <= MAX_WIDTH
            {
                split.push(format!("{}:{}", file.display(), index + 2));
            }
        }
    }

    assert!(split.is_empty(), "`.await` split from a one-line call: {split:#?}");
}
