//! Record selection over a set of header sources.
//!
//! The predicate is parsed once, before any source is opened. Each source is
//! then read, every selected extension evaluated against the predicate, and
//! the requested keywords of matching extensions fed to one
//! [`ResultAggregator`]. A source that cannot be read is skipped with a
//! warning; it never aborts the query.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::aggregate::{ResultAggregator, ResultTable, RowKey};
use crate::config::Config;
use crate::expr::{parse, Expr};
use crate::select::{ExtensionSelection, KeywordSelection};
use crate::source::{DocumentReader, HeaderReader};
use crate::store::AttributeStore;
use crate::value::Literal;
use crate::wildcard::WildcardMatcher;
use crate::{Error, Result};

/// One selection query.
#[derive(Debug, Clone)]
pub struct SelectRequest {
    pub sources: Vec<PathBuf>,
    pub keywords: KeywordSelection,
    pub extensions: ExtensionSelection,
    /// Predicate; `None` selects every extension.
    pub expression: Option<String>,
}

impl SelectRequest {
    pub fn new(sources: Vec<PathBuf>, keywords: KeywordSelection) -> Self {
        Self {
            sources,
            keywords,
            extensions: ExtensionSelection::All,
            expression: None,
        }
    }

    pub fn with_extensions(mut self, extensions: ExtensionSelection) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }
}

/// A source left out of the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSource {
    pub source: String,
    pub reason: String,
}

/// Result of [`Selector::run`].
#[derive(Debug, Clone)]
pub struct SelectOutcome {
    pub table: ResultTable,
    /// Skipped sources, sorted by name.
    pub skipped: Vec<SkippedSource>,
}

/// Keys present in one extension, as listed by [`Selector::keys`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionKeys {
    pub extension: usize,
    pub keys: Vec<String>,
}

/// Runs selection queries.
pub struct Selector<R: HeaderReader = DocumentReader> {
    reader: R,
    matcher: WildcardMatcher,
    jobs: usize,
    cancel: Option<Arc<AtomicBool>>,
}

impl Selector<DocumentReader> {
    /// Selector reading header documents, configured from `config`.
    pub fn new(config: &Config) -> Self {
        Self {
            reader: DocumentReader,
            matcher: config.matcher(),
            jobs: config.jobs.max(1),
            cancel: None,
        }
    }
}

impl Default for Selector<DocumentReader> {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

/// Shared state behind the worker mutex.
struct Collected {
    aggregator: ResultAggregator,
    skipped: Vec<SkippedSource>,
    fatal: Option<Error>,
}

type Rows = Vec<(RowKey, Vec<(String, Literal)>)>;

impl<R: HeaderReader> Selector<R> {
    /// Selector over a custom reader with the default matcher.
    pub fn with_reader(reader: R) -> Self {
        Self {
            reader,
            matcher: WildcardMatcher::default(),
            jobs: 1,
            cancel: None,
        }
    }

    pub fn with_matcher(mut self, matcher: WildcardMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Worker threads; 0 is treated as 1.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Flag checked before each source is opened.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Run `request` and build its result table.
    pub fn run(&self, request: &SelectRequest) -> Result<SelectOutcome> {
        let expr = request.expression.as_deref().map(parse).transpose()?;
        if let Some(expr) = &expr {
            debug!(expression = %expr, keywords = ?expr.keywords(), "parsed predicate");
        }

        let mut sources: Vec<&Path> = Vec::with_capacity(request.sources.len());
        for path in &request.sources {
            if !sources.contains(&path.as_path()) {
                sources.push(path);
            }
        }

        let collected = Mutex::new(Collected {
            aggregator: ResultAggregator::new(),
            skipped: Vec::new(),
            fatal: None,
        });
        let next = AtomicUsize::new(0);
        let workers = self.jobs.min(sources.len()).max(1);

        thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| self.work(&sources, &next, expr.as_ref(), request, &collected));
            }
        });

        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let collected = collected.into_inner();
        if let Some(err) = collected.fatal {
            return Err(err);
        }

        let mut skipped = collected.skipped;
        skipped.sort_by(|a, b| a.source.cmp(&b.source));

        let keywords = &request.keywords;
        let table = collected.aggregator.finalize_with(|key| keywords.rank(key));
        debug!(rows = table.len(), columns = table.columns().len(), "query complete");

        Ok(SelectOutcome { table, skipped })
    }

    fn work(
        &self,
        sources: &[&Path],
        next: &AtomicUsize,
        expr: Option<&Expr>,
        request: &SelectRequest,
        collected: &Mutex<Collected>,
    ) {
        loop {
            if self.is_cancelled() || collected.lock().fatal.is_some() {
                return;
            }
            let Some(path) = sources.get(next.fetch_add(1, Ordering::Relaxed)) else {
                return;
            };

            match self.scan(path, expr, request) {
                Ok(rows) => {
                    let mut guard = collected.lock();
                    for (key, attributes) in rows {
                        if let Err(err) = guard.aggregator.add_row(key, attributes) {
                            guard.fatal.get_or_insert(err);
                            return;
                        }
                    }
                }
                Err(err) => {
                    let source = path.display().to_string();
                    warn!(source = %source, error = %err, "skipping source");
                    let reason = match err {
                        Error::SourceUnavailable { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    collected.lock().skipped.push(SkippedSource { source, reason });
                }
            }
        }
    }

    /// Rows contributed by one source.
    fn scan(&self, path: &Path, expr: Option<&Expr>, request: &SelectRequest) -> Result<Rows> {
        let source = path.display().to_string();
        let headers = self.reader.read(path)?;
        debug!(source = %source, extensions = headers.len(), "read source");

        let mut rows = Vec::new();
        for index in request.extensions.indices(headers.len()) {
            let header = &headers[index];
            if !expr.map_or(true, |e| e.evaluate(header)) {
                continue;
            }
            let attributes = request.keywords.extract(header, &self.matcher);
            rows.push((RowKey::new(source.clone(), index), attributes));
        }
        Ok(rows)
    }

    /// List the keys of each selected extension of `path`.
    ///
    /// Without a pattern every key is listed in header order; with one, the
    /// matching non-reserved keys are listed in name order.
    pub fn keys(
        &self,
        path: &Path,
        pattern: Option<&str>,
        extensions: &ExtensionSelection,
    ) -> Result<Vec<ExtensionKeys>> {
        let headers = self.reader.read(path)?;
        Ok(extensions
            .indices(headers.len())
            .into_iter()
            .map(|extension| {
                let header = &headers[extension];
                let names = header.keys();
                let keys = match pattern {
                    Some(p) => self
                        .matcher
                        .match_keys(p, names.iter().copied())
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                    None => names.into_iter().map(str::to_string).collect(),
                };
                ExtensionKeys { extension, keys }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::ColumnType;
    use crate::store::Header;
    use std::collections::HashMap;

    /// In-memory sources; unknown paths are unavailable.
    #[derive(Default)]
    struct MemoryReader {
        sources: HashMap<PathBuf, Vec<Header>>,
        reads: AtomicUsize,
    }

    impl MemoryReader {
        fn with(mut self, path: &str, headers: Vec<Header>) -> Self {
            self.sources.insert(PathBuf::from(path), headers);
            self
        }
    }

    impl HeaderReader for MemoryReader {
        fn read(&self, path: &Path) -> Result<Vec<Header>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.sources
                .get(path)
                .cloned()
                .ok_or_else(|| Error::unavailable(path.display().to_string(), "no such source"))
        }
    }

    fn three_records() -> MemoryReader {
        MemoryReader::default()
            .with("r1", vec![Header::new().with("A", 4.5)])
            .with("r2", vec![Header::new().with("A", 10.55)])
            .with("r3", vec![Header::new().with("A", 200.0).with("B", "x")])
    }

    fn request(sources: &[&str], keywords: &str) -> SelectRequest {
        SelectRequest::new(
            sources.iter().map(PathBuf::from).collect(),
            KeywordSelection::parse(keywords).unwrap(),
        )
    }

    fn sources_of(table: &ResultTable) -> Vec<&str> {
        table.rows().iter().map(|r| r.source()).collect()
    }

    #[test]
    fn test_three_records_without_predicate() {
        let selector = Selector::with_reader(three_records());
        let outcome = selector.run(&request(&["r1", "r2", "r3"], "A,B")).unwrap();
        let table = &outcome.table;

        assert!(outcome.skipped.is_empty());
        assert_eq!(sources_of(table), vec!["r1", "r2", "r3"]);
        assert_eq!(table.column("A").unwrap().kind, ColumnType::Float);
        assert_eq!(table.column("B").unwrap().kind, ColumnType::Text);
        assert_eq!(
            table.column_values("B").unwrap(),
            vec![None, None, Some(&Literal::from("x"))]
        );
    }

    #[test]
    fn test_three_records_with_predicate() {
        let selector = Selector::with_reader(three_records());
        let outcome = selector
            .run(&request(&["r1", "r2", "r3"], "A,B").with_expression("A<10"))
            .unwrap();
        let table = &outcome.table;

        assert_eq!(sources_of(table), vec!["r1"]);
        assert_eq!(table.get(0, "A"), Some(&Literal::Float(4.5)));
        // B was never observed in a selected record
        assert!(table.column("B").is_none());
    }

    #[test]
    fn test_columns_follow_request_order() {
        let reader = MemoryReader::default().with(
            "a",
            vec![Header::new().with("NAXIS", 2.0).with("NAXIS1", 10.0).with("BUNIT", "E")],
        );
        let outcome = Selector::with_reader(reader)
            .run(&request(&["a"], "BUNIT,NAXIS*"))
            .unwrap();
        let names: Vec<&str> = outcome.table.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["BUNIT", "NAXIS", "NAXIS1"]);
    }

    #[test]
    fn test_unavailable_sources_are_skipped() {
        let selector = Selector::with_reader(three_records());
        let outcome = selector.run(&request(&["r2", "missing", "r1"], "A")).unwrap();

        assert_eq!(sources_of(&outcome.table), vec!["r1", "r2"]);
        assert_eq!(
            outcome.skipped,
            vec![SkippedSource {
                source: "missing".to_string(),
                reason: "no such source".to_string(),
            }]
        );
    }

    #[test]
    fn test_extension_selection() {
        let reader = MemoryReader::default().with(
            "multi",
            vec![
                Header::new().with("NAXIS", 0.0),
                Header::new().with("NAXIS", 2.0),
                Header::new().with("NAXIS", 2.0).with("EXTNAME", "ERR"),
            ],
        );
        let req = request(&["multi"], "NAXIS")
            .with_extensions(ExtensionSelection::Only(vec![2, 0, 9]));
        let outcome = Selector::with_reader(reader).run(&req).unwrap();

        let exts: Vec<usize> = outcome.table.rows().iter().map(|r| r.extension()).collect();
        assert_eq!(exts, vec![0, 2]);
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_record_without_requested_keys_has_no_row() {
        let reader = MemoryReader::default()
            .with("a", vec![Header::new().with("A", 1.0)])
            .with("b", vec![Header::new().with("OTHER", 1.0)]);
        let outcome = Selector::with_reader(reader).run(&request(&["a", "b"], "A")).unwrap();
        assert_eq!(sources_of(&outcome.table), vec!["a"]);
    }

    #[test]
    fn test_duplicate_sources_read_once() {
        let reader = three_records();
        let selector = Selector::with_reader(reader);
        let outcome = selector.run(&request(&["r1", "r1"], "A")).unwrap();
        assert_eq!(outcome.table.len(), 1);
        assert_eq!(selector.reader.reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut reader = MemoryReader::default();
        let mut names = Vec::new();
        for i in 0..40 {
            let name = format!("src{:02}", i);
            let mut header = Header::new().with("IDX", i as f64);
            if i % 3 == 0 {
                header.push("TAG", "third");
            }
            reader = reader.with(&name, vec![header, Header::new().with("IDX", -1.0)]);
            names.push(name);
        }
        names.push("absent".to_string());
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let req = request(&refs, "IDX,TAG").with_expression("IDX >= 0");

        let selector = Selector::with_reader(reader);
        let sequential = selector.run(&req).unwrap();
        let selector = selector.with_jobs(8);
        let parallel = selector.run(&req).unwrap();

        assert_eq!(sequential.table, parallel.table);
        assert_eq!(sequential.skipped, parallel.skipped);
        assert_eq!(parallel.table.len(), 40);
    }

    #[test]
    fn test_cancelled_query() {
        let flag = Arc::new(AtomicBool::new(true));
        let selector = Selector::with_reader(three_records()).with_cancel_flag(flag);
        let err = selector.run(&request(&["r1", "r2"], "A")).unwrap_err();
        assert!(matches!(err, Error::Cancelled));
        assert_eq!(selector.reader.reads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_parse_failure_before_any_source() {
        let selector = Selector::with_reader(three_records());
        let err = selector
            .run(&request(&["r1", "missing"], "A").with_expression("A < (10"))
            .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert_eq!(selector.reader.reads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_keys_listing() {
        let reader = MemoryReader::default().with(
            "a",
            vec![
                Header::new().with("SIMPLE", "T").with("COMMENT", "x"),
                Header::new()
                    .with("FILETYPE", "SCI")
                    .with("FILENAME", "a.fits")
                    .with("HISTORY", "y"),
            ],
        );
        let selector = Selector::with_reader(reader);

        let all = selector.keys(Path::new("a"), None, &ExtensionSelection::All).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].keys, vec!["SIMPLE", "COMMENT"]);

        let matched = selector
            .keys(Path::new("a"), Some("*"), &ExtensionSelection::Only(vec![1]))
            .unwrap();
        assert_eq!(
            matched,
            vec![ExtensionKeys {
                extension: 1,
                keys: vec!["FILENAME".to_string(), "FILETYPE".to_string()],
            }]
        );
    }
}
