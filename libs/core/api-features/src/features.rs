use mongodb::bson::{Bson, Document, doc};
use std::str::FromStr;
use strum::EnumString;

use crate::params::{PageNumber, ParameterMapping};
use crate::queryable::Queryable;

/// Fields matched by the `keyword` search.
pub const SEARCH_FIELDS: [&str; 3] = ["name", "description", "category"];

/// Parameters that steer the pipeline and never become field filters.
pub const RESERVED_KEYS: [&str; 6] = ["keyword", "limit", "page", "multiSearchColumn", "sort", "size"];

const RANGE_OPERATORS: [&str; 4] = ["gt", "gte", "lt", "lte"];

/// Sort direction accepted by the `sort` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum SortDirection {
    #[strum(serialize = "asc", serialize = "ascending")]
    Ascending,
    #[strum(serialize = "desc", serialize = "descending")]
    Descending,
}

impl SortDirection {
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

/// Case-insensitive substring match for a keyword.
pub fn keyword_pattern(keyword: &str) -> Document {
    doc! { "$regex": keyword, "$options": "i" }
}

/// Translates request parameters into a query, one stage at a time.
///
/// Stages are independent and chain by value; the conventional order is
/// `search().filter().pagination(size).sort()`. None of them fail: a missing
/// keyword matches everything, a bad page means page 1 and a malformed sort is
/// ignored.
#[derive(Debug, Clone)]
pub struct ApiFeatures<Q: Queryable> {
    query: Q,
    params: ParameterMapping,
    numeric_fields: Vec<String>,
}

impl<Q: Queryable> ApiFeatures<Q> {
    pub fn new(query: Q, params: ParameterMapping) -> Self {
        Self {
            query,
            params,
            numeric_fields: Vec::new(),
        }
    }

    /// Fields whose equality values are compared as numbers.
    ///
    /// Text for any other field stays text, so `name=1984` matches the
    /// string `"1984"`. Range operands are always read as numbers when they
    /// parse as one.
    pub fn with_numeric_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn params(&self) -> &ParameterMapping {
        &self.params
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    pub fn into_query(self) -> Q {
        self.query
    }

    fn keyword(&self) -> String {
        self.params.text("keyword").unwrap_or_default()
    }

    /// Match `keyword` against name, description or category.
    pub fn search(mut self) -> Self {
        let keyword = self.keyword();
        if keyword.is_empty() {
            return self;
        }

        let pattern = keyword_pattern(&keyword);
        let clauses: Vec<Bson> = SEARCH_FIELDS
            .iter()
            .map(|field| {
                let mut clause = Document::new();
                clause.insert(*field, pattern.clone());
                Bson::Document(clause)
            })
            .collect();

        let mut filter = Document::new();
        filter.insert("$or", clauses);
        tracing::debug!(keyword = %keyword, "Applying keyword search");

        self.query = self.query.find(filter);
        self
    }

    /// Turn the remaining parameters into field filters.
    ///
    /// Range tokens (`price[gte]=100`) become comparison operators and every
    /// column named in `multiSearchColumn` gets the keyword regex when a
    /// keyword is present. Everything else is a literal equality match: keys
    /// starting with `$` are dropped at every level, so a request can only
    /// produce `$gt`, `$gte`, `$lt` and `$lte`.
    pub fn filter(mut self) -> Self {
        let mut filter = Document::new();
        for (key, value) in self.params.as_document().clone() {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            if key.starts_with('$') {
                tracing::debug!(key = %key, "Dropping operator key from filter");
                continue;
            }

            let numeric = self.numeric_fields.iter().any(|field| *field == key);
            filter.insert(key, field_condition(value, numeric));
        }

        let keyword = self.keyword();
        if !keyword.is_empty() {
            if let Some(columns) = self.params.text("multiSearchColumn") {
                let pattern = keyword_pattern(&keyword);
                for column in columns.split(',').map(str::trim) {
                    if column.is_empty()
                        || column.starts_with('$')
                        || RESERVED_KEYS.contains(&column)
                    {
                        continue;
                    }
                    filter.insert(column, pattern.clone());
                }
            }
        }

        tracing::debug!(filter = ?filter, "Applying field filter");
        self.query = self.query.find(filter);
        self
    }

    /// Window the results to one page of `page_size` items.
    pub fn pagination(mut self, page_size: i64) -> Self {
        let page = PageNumber::parse(self.params.get("page")).page();
        let page_index = i64::try_from(page - 1).unwrap_or(i64::MAX);
        let skip = page_size.saturating_mul(page_index).max(0) as u64;

        self.query = self.query.limit(page_size).skip(skip);
        self
    }

    /// Order by `sort=field,direction`.
    pub fn sort(mut self) -> Self {
        let Some(spec) = self.params.text("sort") else {
            return self;
        };

        let tokens: Vec<&str> = spec.split(',').map(str::trim).collect();
        let [field, direction] = tokens.as_slice() else {
            return self;
        };
        if field.is_empty() {
            return self;
        }

        let Ok(direction) = SortDirection::from_str(direction) else {
            tracing::debug!(sort = %spec, "Ignoring unknown sort direction");
            return self;
        };

        let mut order = Document::new();
        order.insert(*field, direction.as_i32());
        self.query = self.query.sort(order);
        self
    }
}

/// Condition for one field: a range document when any range token is
/// present, otherwise a literal value.
fn field_condition(value: Bson, numeric: bool) -> Bson {
    let Bson::Document(nested) = value else {
        return literal_value(value, numeric);
    };

    if !nested.keys().any(|key| RANGE_OPERATORS.contains(&key.as_str())) {
        return literal_value(Bson::Document(nested), numeric);
    }

    let range: Document = nested
        .into_iter()
        .filter(|(key, _)| RANGE_OPERATORS.contains(&key.as_str()))
        .filter_map(|(key, operand)| range_operand(operand).map(|operand| (format!("${key}"), operand)))
        .collect();
    Bson::Document(range)
}

/// Range operands must be scalars; numeric text becomes a number.
fn range_operand(operand: Bson) -> Option<Bson> {
    match operand {
        Bson::String(text) => Some(coerce_number(&text).unwrap_or(Bson::String(text))),
        Bson::Document(_) | Bson::Array(_) => None,
        other => Some(other),
    }
}

fn literal_value(value: Bson, numeric: bool) -> Bson {
    match value {
        Bson::String(text) if numeric => coerce_number(&text).unwrap_or(Bson::String(text)),
        Bson::Document(nested) => Bson::Document(
            nested
                .into_iter()
                .filter(|(key, _)| !key.starts_with('$'))
                .map(|(key, value)| (key, literal_value(value, numeric)))
                .collect(),
        ),
        other => other,
    }
}

fn coerce_number(text: &str) -> Option<Bson> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(Bson::Int64(n));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(Bson::Double)
}
