use futures_util::TryStreamExt;
use mongodb::{Collection, bson::Document, options::FindOptions};
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::error::QueryResult;
use crate::queryable::{FindQuery, Queryable};

impl FindQuery {
    /// Driver options for the window and ordering of this query.
    pub fn find_options(&self) -> FindOptions {
        let mut options = FindOptions::default();
        options.limit = self.max_results();
        options.skip = self.offset();
        options.sort = self.sort_spec().cloned();
        options
    }
}

/// A find query bound to a MongoDB collection.
#[derive(Debug, Clone)]
pub struct MongoQuery<T: Send + Sync> {
    collection: Collection<T>,
    query: FindQuery,
}

impl<T: Send + Sync> MongoQuery<T> {
    pub fn new(collection: Collection<T>) -> Self {
        Self::from_parts(collection, FindQuery::new())
    }

    pub fn from_parts(collection: Collection<T>, query: FindQuery) -> Self {
        Self { collection, query }
    }

    pub fn description(&self) -> &FindQuery {
        &self.query
    }

    pub fn filter(&self) -> Document {
        self.query.filter_document()
    }
}

impl<T> MongoQuery<T>
where
    T: DeserializeOwned + Send + Sync + Unpin,
{
    /// Run the query and collect every matching document.
    #[instrument(skip(self), fields(collection = %self.collection.name()))]
    pub async fn execute(self) -> QueryResult<Vec<T>> {
        let cursor = self
            .collection
            .find(self.query.filter_document())
            .with_options(self.query.find_options())
            .await?;

        let items: Vec<T> = cursor.try_collect().await?;
        tracing::debug!(count = items.len(), "Query executed");
        Ok(items)
    }
}

impl<T: Send + Sync> Queryable for MongoQuery<T> {
    fn find(mut self, filter: Document) -> Self {
        self.query = self.query.find(filter);
        self
    }

    fn limit(mut self, limit: i64) -> Self {
        self.query = self.query.limit(limit);
        self
    }

    fn skip(mut self, skip: u64) -> Self {
        self.query = self.query.skip(skip);
        self
    }

    fn sort(mut self, sort: Document) -> Self {
        self.query = self.query.sort(sort);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_find_options_reflect_window_and_order() {
        let query = FindQuery::new().limit(4).skip(8).sort(doc! { "price": -1 });
        let options = query.find_options();

        assert_eq!(options.limit, Some(4));
        assert_eq!(options.skip, Some(8));
        assert_eq!(options.sort, Some(doc! { "price": -1 }));
    }

    #[test]
    fn test_find_options_default_when_unset() {
        let options = FindQuery::new().find_options();

        assert!(options.limit.is_none());
        assert!(options.skip.is_none());
        assert!(options.sort.is_none());
    }
}
