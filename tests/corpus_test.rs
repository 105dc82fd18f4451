//! Corpus tests - run the default rule set on every SVG in the corpus
//! directory and check that the output is valid, smaller, and stable.

use std::fs;
use std::path::Path;

use svgshrink::{is_valid, optimize, parse_svg};
use walkdir::WalkDir;

/// Every corpus SVG optimizes into a parseable document.
#[test]
fn test_corpus_optimization() {
    let corpus_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/corpus");

    let mut total = 0;
    let mut failed = 0;
    let mut total_original = 0usize;
    let mut total_optimized = 0usize;

    for entry in WalkDir::new(&corpus_dir).sort_by_file_name() {
        let entry = entry.unwrap();
        let path = entry.path();

        if path.extension().is_none_or(|e| e != "svg") {
            continue;
        }

        let rel_path = path.strip_prefix(&corpus_dir).unwrap_or(path);
        let content = fs::read_to_string(path).unwrap();
        total += 1;

        match optimize(&content) {
            Ok(optimized) => {
                if !is_valid(&optimized.markup) {
                    eprintln!("  FAIL {}: output is not an svg document", rel_path.display());
                    failed += 1;
                    continue;
                }
                if let Err(e) = parse_svg(&optimized.markup) {
                    eprintln!("  FAIL {}: output invalid: {}", rel_path.display(), e);
                    failed += 1;
                    continue;
                }
                total_original += optimized.metadata.original_size;
                total_optimized += optimized.metadata.optimized_size;
            }
            Err(e) => {
                eprintln!("  FAIL {}: {}", rel_path.display(), e);
                failed += 1;
            }
        }
    }

    assert!(total > 0, "corpus is empty");
    println!("\nCorpus: {}/{} passed", total - failed, total);
    println!("Size: {} -> {} bytes", total_original, total_optimized);

    assert_eq!(failed, 0, "{} SVG files failed to optimize", failed);
    assert!(total_optimized < total_original);
}

/// Running the default rules twice gives the same result as running once.
#[test]
fn test_corpus_idempotence() {
    let corpus_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/corpus");

    for entry in WalkDir::new(&corpus_dir) {
        let entry = entry.unwrap();
        let path = entry.path();
        if path.extension().is_none_or(|e| e != "svg") {
            continue;
        }

        let content = fs::read_to_string(path).unwrap();
        let once = optimize(&content).unwrap().markup;
        let twice = optimize(&once).unwrap().markup;
        assert_eq!(once, twice, "not idempotent: {}", path.display());
    }
}

#[test]
fn test_inkscape_cleanup() {
    let content = fs::read_to_string(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/corpus/editors/inkscape.svg"),
    )
    .unwrap();
    let optimized = optimize(&content).unwrap().markup;

    assert!(!optimized.contains("inkscape:"), "inkscape data not removed");
    assert!(!optimized.contains("sodipodi:"), "sodipodi data not removed");
    assert!(!optimized.contains("<metadata"), "metadata not removed");
    assert!(!optimized.contains("<g"), "groups not flattened");
    assert!(!optimized.contains("xlink"), "xlink not replaced");
    assert!(!optimized.contains("transform"), "identity transform kept");
    assert!(!optimized.starts_with("<?xml"), "xml declaration kept");

    assert!(optimized.contains(r##"<use fill="#ff0000" href="#r"/>"##), "{optimized}");
    assert!(
        optimized.contains(r##"<rect width="80" height="80" fill="#ff0000" x="10" y="10.5"/>"##),
        "{optimized}"
    );
}

#[test]
fn test_illustrator_cleanup() {
    let content = fs::read_to_string(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/corpus/editors/illustrator.svg"),
    )
    .unwrap();
    let optimized = optimize(&content).unwrap().markup;

    assert!(!optimized.contains("DOCTYPE"));
    assert!(!optimized.contains("enable-background"));
    assert!(!optimized.contains("</path>"));
    assert!(optimized.contains(r#"d="M12,36L36,12""#));
    assert!(optimized.contains(r##"fill="#e5e5e5""##));
    // Only lowercase rgb() is recognised
    assert!(optimized.contains(r#"fill="RGB(10,20,30)""#));
}
