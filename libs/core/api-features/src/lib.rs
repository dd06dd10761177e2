//! Request-to-query translation for list endpoints.
//!
//! [`ParameterMapping`] holds a parsed query string and [`ApiFeatures`]
//! narrows any [`Queryable`] through keyword search, field filters,
//! pagination and sorting. Queries execute either against MongoDB
//! ([`MongoQuery`]) or over in-memory documents ([`memory::evaluate`]).
//!
//! ```
//! use api_features::{ApiFeatures, FindQuery, ParameterMapping};
//!
//! let params = ParameterMapping::from_query_str("keyword=usb&page=2&sort=price,desc");
//! let query = ApiFeatures::new(FindQuery::new(), params)
//!     .search()
//!     .filter()
//!     .pagination(4)
//!     .sort()
//!     .into_query();
//!
//! assert_eq!(query.offset(), Some(4));
//! ```

pub mod error;
pub mod features;
pub mod memory;
pub mod mongo;
pub mod params;
pub mod queryable;

pub use error::{QueryError, QueryResult};
pub use features::{ApiFeatures, RESERVED_KEYS, SEARCH_FIELDS, SortDirection, keyword_pattern};
pub use mongo::MongoQuery;
pub use params::{PageNumber, ParameterMapping};
pub use queryable::{FindQuery, Queryable};
