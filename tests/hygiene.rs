//! Hygiene: enforces coding standards at test time.
//!
//! These tests scan `src/` for antipatterns. Each has a budget (ideally
//! zero). If you must add one, fix an existing one first; the budget never grows.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::Path;

/// Modules allowed to name browser types. Everything else must run natively.
const BROWSER_MODULES: &[&str] = &["engine.rs", "surface.rs"];

struct SourceFile {
    path: String,
    content: String,
}

impl SourceFile {
    fn file_name(&self) -> &str {
        Path::new(&self.path).file_name().and_then(|n| n.to_str()).unwrap_or_default()
    }
}

/// Collect production `.rs` files from `src/`, excluding `_test.rs` files.
fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            let path_str = path.to_string_lossy().to_string();
            if path_str.ends_with("_test.rs") {
                continue;
            }
            if let Ok(content) = fs::read_to_string(&path) {
                out.push(SourceFile { path: path_str, content });
            }
        }
    }
}

fn count_in<'a>(files: impl IntoIterator<Item = &'a SourceFile>, pattern: &str) -> Vec<(String, usize)> {
    files
        .into_iter()
        .filter_map(|file| {
            let count = file.content.lines().filter(|line| line.contains(pattern)).count();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

fn check_budget(files: &[SourceFile], pattern: &str, max: usize) {
    let hits = count_in(files, pattern);
    let count: usize = hits.iter().map(|(_, c)| c).sum();
    let listing = hits
        .iter()
        .map(|(path, count)| format!("  {path}: {count}"))
        .collect::<Vec<_>>()
        .join("\n");
    assert!(count <= max, "`{pattern}` budget exceeded: found {count}, max {max}.\n{listing}");
}

macro_rules! budget {
    ($name:ident, $pattern:expr, $max:expr) => {
        #[test]
        fn $name() {
            check_budget(&source_files(), $pattern, $max);
        }
    };
}

#[test]
fn sources_are_found() {
    let files = source_files();
    assert!(files.iter().any(|f| f.file_name() == "engine.rs"), "run from the crate root");
}

// Panics: these abort the editor.
budget!(unwrap_budget, ".unwrap()", 0);
budget!(expect_budget, ".expect(", 0);
budget!(panic_budget, "panic!(", 0);
budget!(unreachable_budget, "unreachable!(", 0);
budget!(todo_budget, "todo!(", 0);
budget!(unimplemented_budget, "unimplemented!(", 0);

// Silent loss: discards errors without inspecting.
budget!(silent_discard_budget, "let _ =", 0);
budget!(dot_ok_budget, ".ok()", 0);

// Style / structure.
budget!(allow_dead_code_budget, "#[allow(dead_code)]", 0);
budget!(println_budget, "println!(", 0);
budget!(eprintln_budget, "eprintln!(", 0);

#[test]
fn browser_types_stay_in_browser_modules() {
    let files = source_files();
    let native = files.iter().filter(|f| !BROWSER_MODULES.contains(&f.file_name()));
    let hits: Vec<_> = ["web_sys", "js_sys", "wasm_bindgen"]
        .iter()
        .flat_map(|pattern| count_in(native.clone(), pattern))
        .collect();
    assert!(hits.is_empty(), "browser types outside {BROWSER_MODULES:?}: {hits:?}");
}
