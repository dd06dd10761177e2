use mongodb::bson::{Bson, Document};

/// A query that can be narrowed, windowed and ordered.
///
/// Every call returns the updated query, so stages chain by value.
pub trait Queryable: Sized {
    /// Add a filter. Successive filters are combined with AND.
    fn find(self, filter: Document) -> Self;

    /// Cap the number of results.
    fn limit(self, limit: i64) -> Self;

    /// Skip a number of leading results.
    fn skip(self, skip: u64) -> Self;

    /// Add ordering keys (`1` ascending, `-1` descending).
    fn sort(self, sort: Document) -> Self;
}

/// Backend-neutral description of a find query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    filters: Vec<Document>,
    limit: Option<i64>,
    skip: Option<u64>,
    sort: Option<Document>,
}

impl FindQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> &[Document] {
        &self.filters
    }

    /// All filters merged into a single document.
    pub fn filter_document(&self) -> Document {
        match self.filters.as_slice() {
            [] => Document::new(),
            [single] => single.clone(),
            many => {
                let clauses: Vec<Bson> = many.iter().cloned().map(Bson::Document).collect();
                let mut merged = Document::new();
                merged.insert("$and", clauses);
                merged
            }
        }
    }

    pub fn max_results(&self) -> Option<i64> {
        self.limit
    }

    pub fn offset(&self) -> Option<u64> {
        self.skip
    }

    pub fn sort_spec(&self) -> Option<&Document> {
        self.sort.as_ref()
    }
}

impl Queryable for FindQuery {
    fn find(mut self, filter: Document) -> Self {
        if !filter.is_empty() {
            self.filters.push(filter);
        }
        self
    }

    fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    fn sort(mut self, sort: Document) -> Self {
        let spec = self.sort.get_or_insert_with(Document::new);
        for (key, value) in sort {
            spec.insert(key, value);
        }
        self
    }
}
