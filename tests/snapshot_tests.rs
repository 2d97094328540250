use std::fs;
use std::path::Path;

use insta::assert_snapshot;
use mdtoc::toc::render_markdown;
use mdtoc::{Toc, TocConfig, extract};

fn fixture(name: &str) -> Toc {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    extract(&fs::read_to_string(path).unwrap(), &TocConfig::default())
}

#[test]
fn snapshot_getting_started() {
    let toc = fixture("getting-started.md");
    assert_snapshot!(render_markdown(&toc.outline), @r"
- [Getting Started with the Blog](#getting-started-with-the-blog)
- [Prerequisites](#prerequisites)
  - [Installing Node.js](#installing-nodejs)
  - [Installing the database](#installing-the-database)
- [Configuration](#configuration)
  - [Environment variables](#environment-variables)
  - [What's in .env?](#whats-in-env)
- [Writing your first post](#writing-your-first-post)
  - [Front matter](#front-matter)
  - [Images diagram](#images-diagram)
- [FAQ](#faq)
  - [Why Markdown?](#why-markdown)
  - [Why Markdown?](#why-markdown-1)
- [FAQ](#faq-1)
");
    assert_eq!(toc.counts.total, 14);
    assert_eq!((toc.counts.h1, toc.counts.h2, toc.counts.h3), (1, 5, 8));
}

#[test]
fn snapshot_unicode_and_setext() {
    let toc = fixture("unicode-and-setext.md");
    assert_snapshot!(render_markdown(&toc.outline), @r"
- [Unicode & Setext](#unicode-setext)
- [安装 Installation](#安装-installation)
- [配置 Configuration](#配置-configuration)
- [🎉 新功能](#新功能)
  - [✨ Feature 1](#feature-1)
  - [🚀 Feature 2](#feature-2)
- [Café au lait](#café-au-lait)
- [Rendered by HTML](#rendered-by-html)
- [Rendered by HTML](#rendered-by-html-1)
");
    assert_eq!(toc.counts.total, 9);
}

#[test]
fn snapshot_inline_markup_top_level_one() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/inline-markup.md");
    let markdown = fs::read_to_string(path).unwrap();
    let toc = extract(&markdown, &TocConfig::new([1]).unwrap());

    assert_snapshot!(render_markdown(&toc.outline), @r"
- [API Reference](#api-reference)
  - [Methods](#methods)
  - [Array.prototype.map()](#arrayprototypemap)
  - [Array.prototype.filter()](#arrayprototypefilter)
  - [Using bold and italic and underscores](#using-bold-and-italic-and-underscores)
  - [Working with links](#working-with-links)
  - [Deprecated Features](#deprecated-features)
  - [snake_case_names](#snake_case_names)
  - [Deeply nested](#deeply-nested)
  - [Deepest](#deepest)
  - [Closing hashes](#closing-hashes)
");
    assert_eq!(toc.counts.total, 11);
    assert_eq!((toc.counts.h4, toc.counts.h5, toc.counts.h6), (1, 0, 1));
}
