use std::fs;
use std::path::Path;

use mdtoc::check::{Mismatch, verify};
use mdtoc::{HeadingKind, TocConfig, extract};
use walkdir::WalkDir;

fn fixtures() -> Vec<(String, String)> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let mut docs: Vec<(String, String)> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
        .map(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            (name, fs::read_to_string(e.path()).unwrap())
        })
        .collect();
    docs.sort();
    docs
}

#[test]
fn test_fixture_corpus_passes_regression_check() {
    let docs = fixtures();
    assert_eq!(docs.len(), 3, "fixture corpus went missing");

    for (name, markdown) in &docs {
        let report = verify(markdown, &TocConfig::default());
        assert!(report.is_ok(), "{name}: {:?}", report.mismatches);
        assert!(report.checked > 0, "{name} has no headings");
    }
}

#[test]
fn test_fixture_corpus_passes_with_every_top_level() {
    for (name, markdown) in fixtures() {
        for top in 1..=6 {
            let config = TocConfig::new([top]).unwrap();
            assert!(verify(&markdown, &config).is_ok(), "{name} at h{top}");
        }
    }
}

#[test]
fn test_slug_regression_sample() {
    // Same sample the blog's slug regression script diffs against its slugger.
    let md = "## Hello **world**
## Hello world
# Title

## Hello **world**

### Subheading";

    let toc = extract(md, &TocConfig::default());
    assert_eq!(
        toc.anchors(),
        vec![
            "#hello-world",
            "#hello-world-1",
            "#title",
            "#hello-world-2",
            "#subheading",
        ]
    );
    assert!(verify(md, &TocConfig::default()).is_ok());
}

#[test]
fn test_title_corpus_matches_reference_slugs() {
    let cases = [
        ("Hello, World!", "hello-world"),
        ("What's new in v2.0?", "whats-new-in-v20"),
        ("Café au lait", "café-au-lait"),
        ("你好世界", "你好世界"),
        ("🎉 新功能", "新功能"),
        ("Intro - description", "intro---description"),
        ("snake_case_names", "snake_case_names"),
        ("C++ & Rust", "c-rust"),
        ("Über Cool", "über-cool"),
    ];

    let md: String = cases
        .iter()
        .map(|(title, _)| format!("## {title}\n\n"))
        .collect();
    let toc = extract(&md, &TocConfig::default());

    let slugs: Vec<&str> = toc.headings.iter().map(|h| h.slug.as_str()).collect();
    let expected: Vec<&str> = cases.iter().map(|(_, slug)| *slug).collect();
    assert_eq!(slugs, expected);
    assert!(verify(&md, &TocConfig::default()).is_ok());
}

#[test]
fn test_html_heading_fixture_shares_registry() {
    let md = fs::read_to_string(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/unicode-and-setext.md"),
    )
    .unwrap();
    let toc = extract(&md, &TocConfig::default());

    let html: Vec<_> = toc
        .headings
        .iter()
        .filter(|h| h.kind == HeadingKind::Html)
        .collect();
    assert_eq!(html.len(), 1);
    assert_eq!(html[0].slug, "rendered-by-html");
    assert_eq!(toc.headings.last().unwrap().slug, "rendered-by-html-1");
}

#[test]
fn test_divergence_is_reported_not_hidden() {
    let report = verify("Intro\n\n    ## indented\n", &TocConfig::default());
    assert!(!report.is_ok());
    assert!(matches!(report.mismatches[0], Mismatch::Count { expected: 0, found: 1 }));
}
