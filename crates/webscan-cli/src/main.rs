//! WebScan - Main Entry Point

use std::path::PathBuf;

use anyhow::{Context, bail};
use tracing_subscriber::EnvFilter;
use webscan_engine::Scanner;

/// Parsed command line.
struct Args {
    /// Page URL to fetch and scan.
    url: Option<String>,
    /// Local HTML file to scan instead of fetching.
    html_file: Option<PathBuf>,
    /// Optional local CSS file scanned alongside `html_file`.
    css_file: Option<PathBuf>,
    /// Where to write the highlighted markup, if anywhere.
    out_file: Option<PathBuf>,
}

fn usage() -> ! {
    eprintln!("webscan {}", webscan_engine::VERSION);
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  webscan <url> [--out FILE]");
    eprintln!("  webscan --html FILE [--css FILE] [--out FILE]");
    std::process::exit(2);
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        url: None,
        html_file: None,
        css_file: None,
        out_file: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--html" => {
                let path = iter.next().unwrap_or_else(|| usage());
                args.html_file = Some(PathBuf::from(path));
            }
            "--css" => {
                let path = iter.next().unwrap_or_else(|| usage());
                args.css_file = Some(PathBuf::from(path));
            }
            "--out" => {
                let path = iter.next().unwrap_or_else(|| usage());
                args.out_file = Some(PathBuf::from(path));
            }
            "--help" | "-h" => usage(),
            _ if args.url.is_none() && !arg.starts_with('-') => args.url = Some(arg),
            _ => usage(),
        }
    }

    if args.url.is_none() && args.html_file.is_none() {
        usage();
    }
    if args.url.is_some() && args.html_file.is_some() {
        bail!("pass either a URL or --html FILE, not both");
    }
    if args.css_file.is_some() && args.html_file.is_none() {
        bail!("--css requires --html");
    }
    Ok(args)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let scanner = Scanner::embedded();

    let result = if let Some(url) = &args.url {
        tracing::info!("scanning {url}");
        scanner.scan_url(url)?
    } else {
        let html_path = args.html_file.as_ref().unwrap();
        let html = std::fs::read_to_string(html_path)
            .with_context(|| format!("reading {}", html_path.display()))?;
        let inline = webscan_engine::net::inline_style_blocks(&html);
        let mut css_parts = inline.clone();
        if let Some(path) = &args.css_file {
            css_parts.push(
                std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?,
            );
        }
        let css = css_parts.join("\n");
        scanner.scan_document(&html, &css, 0, inline.len())
    };

    println!("{}", serde_json::to_string_pretty(&result)?);

    if let Some(out) = &args.out_file {
        std::fs::write(out, &result.highlighted_html_content)
            .with_context(|| format!("writing {}", out.display()))?;
        tracing::info!("highlighted markup written to {}", out.display());
    }

    Ok(())
}
