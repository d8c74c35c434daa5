//! CLI command implementations.

use std::io::{self, Write};

use hdrq::{
    expand_sources, parse, render, Config, Error, ExtensionSelection, KeywordSelection,
    OutputFormat, RenderOptions, SelectRequest, Selector,
};
use tracing::warn;

/// Options for `hselect select`. `None` falls back to the config.
pub struct SelectOptions<'a> {
    pub extensions: Option<&'a str>,
    pub expr: Option<&'a str>,
    pub format: Option<&'a str>,
    pub jobs: Option<usize>,
    pub header: bool,
    pub placeholder: Option<&'a str>,
    pub quiet: bool,
}

fn parse_extensions(extensions: Option<&str>) -> hdrq::Result<ExtensionSelection> {
    extensions.map_or(Ok(ExtensionSelection::All), ExtensionSelection::parse)
}

pub fn select(
    config: &Config,
    sources: &[String],
    keywords: &str,
    opts: &SelectOptions<'_>,
) -> hdrq::Result<()> {
    // Validate everything cheap before touching the filesystem
    let keywords = KeywordSelection::parse(keywords)?;
    let extensions = parse_extensions(opts.extensions)?;
    let format: OutputFormat = opts.format.unwrap_or(&config.format).parse()?;
    if let Some(expr) = opts.expr {
        parse(expr)?;
    }

    let paths = expand_sources(sources)?;
    if paths.is_empty() {
        return Err(Error::NoSources(sources.join(" ")));
    }

    let mut request = SelectRequest::new(paths, keywords).with_extensions(extensions);
    if let Some(expr) = opts.expr {
        request = request.with_expression(expr);
    }

    let selector = Selector::new(config).with_jobs(opts.jobs.unwrap_or(config.jobs));
    let outcome = selector.run(&request)?;

    let render_opts = RenderOptions {
        placeholder: opts.placeholder.unwrap_or(&config.placeholder).to_string(),
        header: opts.header && config.header,
    };
    let out = render(&outcome.table, format, &render_opts)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(out.as_bytes())?;
    stdout.flush()?;

    if !outcome.skipped.is_empty() && !opts.quiet {
        eprintln!(
            "hselect: {} source(s) skipped: {}",
            outcome.skipped.len(),
            outcome
                .skipped
                .iter()
                .map(|s| s.source.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    Ok(())
}

pub fn check(expr: &str) -> hdrq::Result<()> {
    let parsed = parse(expr)?;
    println!("{}", parsed);
    Ok(())
}

pub fn keys(
    config: &Config,
    sources: &[String],
    pattern: Option<&str>,
    extensions: Option<&str>,
) -> hdrq::Result<()> {
    let extensions = parse_extensions(extensions)?;
    let paths = expand_sources(sources)?;
    if paths.is_empty() {
        return Err(Error::NoSources(sources.join(" ")));
    }

    let selector = Selector::new(config);
    let mut stdout = io::stdout().lock();
    let mut failed = 0;

    for path in &paths {
        let listing = match selector.keys(path, pattern, &extensions) {
            Ok(listing) => listing,
            Err(e) => {
                warn!(source = %path.display(), error = %e, "skipping source");
                failed += 1;
                continue;
            }
        };
        for ext in listing {
            writeln!(stdout, "{}[{}]: {}", path.display(), ext.extension, ext.keys.join(" "))?;
        }
    }
    stdout.flush()?;

    if failed == paths.len() {
        return Err(Error::NoSources(sources.join(" ")));
    }
    Ok(())
}
