//! Query-string parameters parsed into a nested document.

use mongodb::bson::{Bson, Document};

/// Maximum number of bracket segments expanded per key.
const MAX_DEPTH: usize = 5;

/// Parameters of one request, keyed by name.
///
/// Bracket keys are expanded into nested documents, so `price[gte]=100`
/// becomes `{ "price": { "gte": "100" } }`. Values parsed from a query string
/// are always text; numeric coercion happens when a filter is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterMapping(Document);

impl ParameterMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string (without the leading `?`).
    ///
    /// Pairs are split on `&`, `+` decodes to a space and percent escapes are
    /// decoded. When a key repeats, the last value wins.
    pub fn from_query_str(query: &str) -> Self {
        let mut params = Self::new();

        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode_component(raw_key);
            if key.is_empty() {
                continue;
            }

            let value = decode_component(raw_value);
            insert_path(&mut params.0, &key_path(&key), Bson::String(value));
        }

        params
    }

    /// Builder-style insert, mostly useful in tests and internal callers.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.0.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Bson>) {
        self.0.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&Bson> {
        self.0.get(key)
    }

    /// Scalar value rendered as text. Nested documents yield `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(scalar_text)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_document(&self) -> &Document {
        &self.0
    }

    pub fn into_document(self) -> Document {
        self.0
    }
}

impl From<Document> for ParameterMapping {
    fn from(document: Document) -> Self {
        Self(document)
    }
}

/// Outcome of reading the `page` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumber {
    Absent,
    Invalid,
    Zero,
    Valid(u64),
}

impl PageNumber {
    pub fn parse(value: Option<&Bson>) -> Self {
        let Some(value) = value else {
            return Self::Absent;
        };

        let number = match value {
            Bson::Int32(n) => Some(i64::from(*n)),
            Bson::Int64(n) => Some(*n),
            Bson::Double(n) => whole_number(*n),
            Bson::String(text) => {
                let text = text.trim();
                text.parse::<i64>()
                    .ok()
                    .or_else(|| text.parse::<f64>().ok().and_then(whole_number))
            }
            _ => None,
        };

        match number {
            Some(0) => Self::Zero,
            Some(n) if n > 0 => Self::Valid(n as u64),
            _ => Self::Invalid,
        }
    }

    /// The 1-based page to serve. Anything but a positive whole number is page 1.
    pub fn page(self) -> u64 {
        match self {
            Self::Valid(page) => page,
            Self::Absent | Self::Invalid | Self::Zero => 1,
        }
    }
}

fn whole_number(n: f64) -> Option<i64> {
    (n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64).then_some(n as i64)
}

pub(crate) fn scalar_text(value: &Bson) -> Option<String> {
    match value {
        Bson::String(text) => Some(text.clone()),
        Bson::Int32(n) => Some(n.to_string()),
        Bson::Int64(n) => Some(n.to_string()),
        Bson::Double(n) => Some(n.to_string()),
        Bson::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    let decoded = urlencoding::decode(&spaced).map(|text| text.into_owned());
    decoded.unwrap_or(spaced)
}

/// Split `a[b][c]` into `["a", "b", "c"]`. Keys without a well-formed
/// bracket suffix are kept verbatim.
fn key_path(key: &str) -> Vec<String> {
    let open = match key.find('[') {
        Some(open) if open > 0 => open,
        _ => return vec![key.to_string()],
    };

    let mut path = vec![key[..open].to_string()];
    let mut rest = &key[open..];
    let mut parsed_any = false;

    while path.len() <= MAX_DEPTH {
        let Some(inner) = rest.strip_prefix('[') else {
            break;
        };
        let Some(close) = inner.find(']') else {
            break;
        };

        let segment = &inner[..close];
        if !segment.is_empty() {
            path.push(segment.to_string());
        }
        parsed_any = true;
        rest = &inner[close + 1..];
    }

    if !parsed_any {
        return vec![key.to_string()];
    }
    if !rest.is_empty() {
        path.push(rest.to_string());
    }
    path
}

fn insert_path(document: &mut Document, path: &[String], value: Bson) {
    match path {
        [] => {}
        [leaf] => {
            document.insert(leaf.clone(), value);
        }
        [head, rest @ ..] => {
            if !matches!(document.get(head), Some(Bson::Document(_))) {
                document.insert(head.clone(), Document::new());
            }
            if let Some(Bson::Document(child)) = document.get_mut(head) {
                insert_path(child, rest, value);
            }
        }
    }
}
