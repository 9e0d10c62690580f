//! Wren CLI
//!
//! A headless renderer for testing and debugging: parses a document,
//! runs the full pipeline, and prints the DOM tree and display list.

use std::env;
use std::fs;

use anyhow::{Context, Result};
use wren_browser::Page;
use wren_common::Url;
use wren_css::ApproximateFontProvider;
use wren_html::print_tree;

const DEFAULT_VIEWPORT_WIDTH: f32 = 800.0;
const DEFAULT_URL: &str = "file:///dev/stdin";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: wren <file.html> [--width <px>] [--url <base>] [--json]");
        eprintln!("       wren --html '<html>...</html>' [options]");
        std::process::exit(1);
    }

    let mut html: Option<String> = None;
    let mut width = DEFAULT_VIEWPORT_WIDTH;
    let mut base_url = DEFAULT_URL.to_string();
    let mut json = false;

    let mut rest = args[1..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--html" => {
                let value = rest.next().context("--html requires an HTML string")?;
                html = Some(value.clone());
            }
            "--width" => {
                let value = rest.next().context("--width requires a pixel value")?;
                width = value.parse().context("--width must be a number")?;
            }
            "--url" => {
                let value = rest.next().context("--url requires a URL")?;
                base_url = value.clone();
            }
            "--json" => json = true,
            path => {
                let contents =
                    fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
                html = Some(contents);
                if base_url == DEFAULT_URL {
                    base_url = format!("file://{path}");
                }
            }
        }
    }

    let html = html.context("no document given; pass a file or --html")?;
    let url = Url::parse(&base_url).with_context(|| format!("parsing base URL {base_url}"))?;

    let fonts = ApproximateFontProvider;
    let page = Page::load(url, &html, &[], &fonts, width)?;

    if json {
        println!("{}", serde_json::to_string_pretty(page.display_list())?);
        return Ok(());
    }

    println!("=== DOM Tree ===");
    print_tree(page.tree(), page.tree().root(), 0);

    println!("\n=== Cascade ===");
    println!("{} rules", page.rules().len());

    println!("\n=== Display List ===");
    println!("{} commands", page.display_list().len());
    for command in page.display_list() {
        let rect = command.rect();
        println!(
            "  [{:7.1},{:7.1} {:7.1},{:7.1}] {command:?}",
            rect.left, rect.top, rect.right, rect.bottom
        );
    }

    Ok(())
}
