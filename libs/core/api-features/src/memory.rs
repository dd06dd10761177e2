//! Evaluates a [`FindQuery`] over documents held in memory.
//!
//! Supports the subset of the document-store query language the feature
//! pipeline produces: equality, `$and`, `$or`, `$regex` with `$options`,
//! `$eq`, `$ne`, `$gt`, `$gte`, `$lt` and `$lte`.

use mongodb::bson::{self, Bson, Document};
use regex::RegexBuilder;
use serde::{Serialize, de::DeserializeOwned};
use std::cmp::Ordering;

use crate::error::{QueryError, QueryResult};
use crate::queryable::FindQuery;

/// Filter, sort, skip and limit `documents` as the query describes.
pub fn evaluate<I>(query: &FindQuery, documents: I) -> QueryResult<Vec<Document>>
where
    I: IntoIterator<Item = Document>,
{
    let filter = query.filter_document();

    let mut matched = Vec::new();
    for document in documents {
        if matches(&document, &filter)? {
            matched.push(document);
        }
    }

    if let Some(spec) = query.sort_spec() {
        sort_documents(&mut matched, spec)?;
    }

    let skip = usize::try_from(query.offset().unwrap_or(0)).unwrap_or(usize::MAX);
    let limit = match query.max_results() {
        None | Some(0) => usize::MAX,
        Some(n) => usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX),
    };

    Ok(matched.into_iter().skip(skip).take(limit).collect())
}

/// Whether `document` satisfies `filter`.
pub fn matches(document: &Document, filter: &Document) -> QueryResult<bool> {
    for (key, condition) in filter {
        let satisfied = match key.as_str() {
            "$and" => all_clauses(document, condition, key)?,
            "$or" => any_clause(document, condition, key)?,
            op if op.starts_with('$') => {
                return Err(QueryError::UnsupportedOperator(op.to_string()));
            }
            path => field_matches(lookup(document, path), condition)?,
        };

        if !satisfied {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Serialize records for evaluation.
pub fn to_documents<T: Serialize>(items: &[T]) -> QueryResult<Vec<Document>> {
    items
        .iter()
        .map(|item| bson::to_document(item).map_err(|e| QueryError::Conversion(e.to_string())))
        .collect()
}

/// Deserialize evaluated documents back into records.
pub fn from_documents<T: DeserializeOwned>(documents: Vec<Document>) -> QueryResult<Vec<T>> {
    documents
        .into_iter()
        .map(|document| bson::from_document(document).map_err(|e| QueryError::Conversion(e.to_string())))
        .collect()
}

fn clauses<'a>(condition: &'a Bson, operator: &str) -> QueryResult<&'a Vec<Bson>> {
    match condition {
        Bson::Array(items) => Ok(items),
        _ => Err(QueryError::MalformedClause(format!("{operator} expects an array"))),
    }
}

fn clause_document<'a>(clause: &'a Bson, operator: &str) -> QueryResult<&'a Document> {
    match clause {
        Bson::Document(document) => Ok(document),
        _ => Err(QueryError::MalformedClause(format!("{operator} expects documents"))),
    }
}

fn all_clauses(document: &Document, condition: &Bson, operator: &str) -> QueryResult<bool> {
    for clause in clauses(condition, operator)? {
        if !matches(document, clause_document(clause, operator)?)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn any_clause(document: &Document, condition: &Bson, operator: &str) -> QueryResult<bool> {
    for clause in clauses(condition, operator)? {
        if matches(document, clause_document(clause, operator)?)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Resolve a dotted path such as `images.url`.
fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;

    for segment in segments {
        current = match current {
            Bson::Document(nested) => nested.get(segment)?,
            _ => return None,
        };
    }

    Some(current)
}

fn is_operator_document(condition: &Bson) -> Option<&Document> {
    match condition {
        Bson::Document(document) if document.keys().next().is_some_and(|key| key.starts_with('$')) => {
            Some(document)
        }
        _ => None,
    }
}

fn field_matches(value: Option<&Bson>, condition: &Bson) -> QueryResult<bool> {
    let Some(operators) = is_operator_document(condition) else {
        return Ok(equals(value, condition));
    };

    for (operator, operand) in operators {
        let satisfied = match operator.as_str() {
            "$regex" => regex_matches(value, operand, operators.get_str("$options").unwrap_or(""))?,
            "$options" => true,
            "$eq" => equals(value, operand),
            "$ne" => !equals(value, operand),
            "$gt" => compares(value, operand, Ordering::is_gt),
            "$gte" => compares(value, operand, Ordering::is_ge),
            "$lt" => compares(value, operand, Ordering::is_lt),
            "$lte" => compares(value, operand, Ordering::is_le),
            other => return Err(QueryError::UnsupportedOperator(other.to_string())),
        };

        if !satisfied {
            return Ok(false);
        }
    }

    Ok(true)
}

fn equals(value: Option<&Bson>, expected: &Bson) -> bool {
    match value {
        None => matches!(expected, Bson::Null),
        Some(Bson::Array(items)) if !matches!(expected, Bson::Array(_)) => {
            items.iter().any(|item| scalar_eq(item, expected))
        }
        Some(actual) => scalar_eq(actual, expected),
    }
}

fn scalar_eq(actual: &Bson, expected: &Bson) -> bool {
    match (as_number(actual), as_number(expected)) {
        (Some(a), Some(b)) => a == b,
        _ => actual == expected,
    }
}

fn compares(value: Option<&Bson>, operand: &Bson, accept: fn(Ordering) -> bool) -> bool {
    match value {
        Some(Bson::Array(items)) => items
            .iter()
            .any(|item| compare_same_type(item, operand).is_some_and(accept)),
        Some(actual) => compare_same_type(actual, operand).is_some_and(accept),
        None => false,
    }
}

/// Ordering between two values of comparable types; `None` otherwise.
fn compare_same_type(a: &Bson, b: &Bson) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y);
    }

    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::DateTime(x), Bson::DateTime(y)) => Some(x.cmp(y)),
        (Bson::Boolean(x), Bson::Boolean(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

fn regex_matches(value: Option<&Bson>, pattern: &Bson, options: &str) -> QueryResult<bool> {
    let Bson::String(pattern) = pattern else {
        return Err(QueryError::MalformedClause("$regex expects a string".to_string()));
    };

    let regex = RegexBuilder::new(pattern)
        .case_insensitive(options.contains('i'))
        .multi_line(options.contains('m'))
        .dot_matches_new_line(options.contains('s'))
        .ignore_whitespace(options.contains('x'))
        .build()
        .map_err(|e| QueryError::InvalidPattern {
            pattern: pattern.clone(),
            details: e.to_string(),
        })?;

    Ok(match value {
        Some(Bson::String(text)) => regex.is_match(text),
        Some(Bson::Array(items)) => items
            .iter()
            .any(|item| matches!(item, Bson::String(text) if regex.is_match(text))),
        _ => false,
    })
}

/// Cross-type ordering rank, lowest first.
fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) | Some(Bson::Undefined) => 1,
        Some(Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_)) => 2,
        Some(Bson::String(_) | Bson::Symbol(_)) => 3,
        Some(Bson::Document(_)) => 4,
        Some(Bson::Array(_)) => 5,
        Some(Bson::Binary(_)) => 6,
        Some(Bson::ObjectId(_)) => 7,
        Some(Bson::Boolean(_)) => 8,
        Some(Bson::DateTime(_)) => 9,
        Some(Bson::Timestamp(_)) => 10,
        Some(Bson::RegularExpression(_)) => 11,
        Some(_) => 12,
    }
}

fn compare_for_sort(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    let by_rank = type_rank(a).cmp(&type_rank(b));
    if by_rank != Ordering::Equal {
        return by_rank;
    }

    match (a, b) {
        (Some(x), Some(y)) => compare_same_type(x, y).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

fn sort_documents(documents: &mut [Document], spec: &Document) -> QueryResult<()> {
    let mut keys = Vec::with_capacity(spec.len());
    for (field, direction) in spec {
        let descending = match direction {
            Bson::Int32(1) | Bson::Int64(1) => false,
            Bson::Int32(-1) | Bson::Int64(-1) => true,
            Bson::Double(d) if *d == 1.0 => false,
            Bson::Double(d) if *d == -1.0 => true,
            _ => return Err(QueryError::InvalidSort(field.clone())),
        };
        keys.push((field.as_str(), descending));
    }

    documents.sort_by(|a, b| {
        for (field, descending) in &keys {
            let ordering = compare_for_sort(lookup(a, field), lookup(b, field));
            let ordering = if *descending { ordering.reverse() } else { ordering };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });

    Ok(())
}
