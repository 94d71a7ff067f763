//! In-memory Tantivy index over session titles.
//!
//! The index is rebuilt from scratch whenever the session collection
//! changes; there is no incremental update path.

use tantivy::{
    collector::TopDocs,
    query::{BooleanQuery, FuzzyTermQuery, Occur, Query, TermQuery},
    schema::{Field, IndexRecordOption, Schema, Value, STORED, STRING, TEXT},
    tokenizer::TokenStream,
    Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term,
};
use tracing::{debug, warn};

use crate::error::{HistoryError, Result};
use crate::merge::{MatchResult, Strategy};
use crate::session::SessionMetadata;

/// Smallest arena Tantivy accepts for a single indexing thread.
const WRITER_MEMORY_BUDGET: usize = 15_000_000;

/// How a query token is compared against indexed title tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchMode {
    Exact,
    /// Edit distance of `round(token_len * tolerance)`.
    Fuzzy(f32),
    /// Title token starts with the query token, allowing
    /// `round(token_len * tolerance)` edits in the prefix.
    Prefix(f32),
}

impl MatchMode {
    pub fn strategy(&self) -> Strategy {
        match self {
            MatchMode::Exact => Strategy::Exact,
            MatchMode::Fuzzy(_) => Strategy::Fuzzy,
            MatchMode::Prefix(_) => Strategy::Prefix,
        }
    }
}

#[derive(Clone, Copy)]
struct Fields {
    id: Field,
    title: Field,
}

struct Built {
    index: Index,
    reader: IndexReader,
    fields: Fields,
    num_docs: usize,
}

pub struct TitleIndex {
    built: Option<Built>,
    max_edit_distance: u8,
}

impl TitleIndex {
    pub fn new(max_edit_distance: u8) -> Self {
        Self {
            built: None,
            max_edit_distance,
        }
    }

    /// Number of indexed sessions.
    pub fn len(&self) -> usize {
        self.built.as_ref().map_or(0, |b| b.num_docs)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the whole index with `records`.
    ///
    /// The previous content is dropped before building, so on error the
    /// index is left empty. Records without a session id are skipped.
    pub fn rebuild(&mut self, records: &[SessionMetadata]) -> Result<usize> {
        self.built = None;
        let built = build(records)?;
        let num_docs = built.num_docs;
        self.built = Some(built);
        Ok(num_docs)
    }

    pub fn lookup(&self, query: &str, mode: MatchMode) -> Result<Vec<MatchResult>> {
        let Some(built) = &self.built else {
            return Ok(Vec::new());
        };
        if built.num_docs == 0 {
            return Ok(Vec::new());
        }

        let strategy = mode.strategy();
        let lookup_err = |source: tantivy::TantivyError| HistoryError::Lookup {
            strategy: strategy.name(),
            source,
        };

        let tokens = tokenize(built, query).map_err(lookup_err)?;
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let clauses: Vec<(Occur, Box<dyn Query>)> = tokens
            .iter()
            .map(|token| (Occur::Should, self.clause(built.fields.title, token, mode)))
            .collect();
        let query = BooleanQuery::new(clauses);

        let searcher = built.reader.searcher();
        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(built.num_docs))
            .map_err(lookup_err)?;

        let mut results = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher.doc(doc_address).map_err(lookup_err)?;
            let Some(id) = doc.get_first(built.fields.id).and_then(|v| v.as_str()) else {
                continue;
            };
            results.push(MatchResult {
                id: id.to_string(),
                score,
                strategy,
            });
        }

        debug!(strategy = strategy.name(), hits = results.len(), "title lookup");
        Ok(results)
    }

    fn clause(&self, title: Field, token: &str, mode: MatchMode) -> Box<dyn Query> {
        let term = Term::from_field_text(title, token);
        match mode {
            MatchMode::Exact => Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs)),
            MatchMode::Fuzzy(tolerance) => Box::new(FuzzyTermQuery::new(
                term,
                edit_distance(token, tolerance, self.max_edit_distance),
                true,
            )),
            MatchMode::Prefix(tolerance) => Box::new(FuzzyTermQuery::new_prefix(
                term,
                edit_distance(token, tolerance, self.max_edit_distance),
                true,
            )),
        }
    }
}

/// Allowed edits for `token`: its length in chars times `tolerance`, rounded, capped.
pub fn edit_distance(token: &str, tolerance: f32, cap: u8) -> u8 {
    let len = token.chars().count() as f32;
    let distance = (len * tolerance.max(0.0)).round();
    if distance >= f32::from(cap) {
        cap
    } else {
        distance as u8
    }
}

fn build_schema() -> (Schema, Fields) {
    let mut schema_builder = Schema::builder();
    let id = schema_builder.add_text_field("session_id", STRING | STORED);
    let title = schema_builder.add_text_field("title", TEXT);
    (schema_builder.build(), Fields { id, title })
}

fn build(records: &[SessionMetadata]) -> Result<Built> {
    let build_err = HistoryError::IndexBuild;

    let (schema, fields) = build_schema();
    let index = Index::create_in_ram(schema);
    let mut writer: IndexWriter = index
        .writer_with_num_threads(1, WRITER_MEMORY_BUDGET)
        .map_err(build_err)?;

    let mut num_docs = 0;
    for record in records {
        if record.session_id.is_empty() {
            warn!(title = %record.title, "skipping session without an id");
            continue;
        }
        let mut doc = TantivyDocument::default();
        doc.add_text(fields.id, &record.session_id);
        doc.add_text(fields.title, &record.title);
        writer.add_document(doc).map_err(build_err)?;
        num_docs += 1;
    }
    writer.commit().map_err(build_err)?;

    let reader = index
        .reader_builder()
        .reload_policy(ReloadPolicy::Manual)
        .try_into()
        .map_err(build_err)?;

    Ok(Built {
        index,
        reader,
        fields,
        num_docs,
    })
}

/// Run `text` through the title field's analyzer, dropping repeated tokens.
fn tokenize(built: &Built, text: &str) -> tantivy::Result<Vec<String>> {
    let mut analyzer = built.index.tokenizer_for_field(built.fields.title)?;
    let mut stream = analyzer.token_stream(text);
    let mut tokens: Vec<String> = Vec::new();
    while let Some(token) = stream.next() {
        if !tokens.contains(&token.text) {
            tokens.push(token.text.clone());
        }
    }
    Ok(tokens)
}
