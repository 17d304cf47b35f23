//! Table query model.
//!
//! A small, closed description of the only query shapes the application
//! uses against the remote store: equality filters, one case-insensitive
//! OR group across text columns, a single order column, and a row limit.
//! Backends translate this model rather than accepting raw query strings.

use serde_json::Value;

/// Sort direction for [`Query::order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        }
    }
}

/// A single row filter.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Column equals the given value.
    Eq { column: String, value: Value },
    /// Case-insensitive substring match against any of the given columns.
    IlikeAny { columns: Vec<String>, needle: String },
}

/// Declarative select/update/delete target: filters plus optional order
/// and limit.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq {
            column: column.to_owned(),
            value: value.into(),
        });
        self
    }

    pub fn ilike_any(mut self, columns: &[&str], needle: &str) -> Self {
        self.filters.push(Filter::IlikeAny {
            columns: columns.iter().map(|c| (*c).to_owned()).collect(),
            needle: needle.to_owned(),
        });
        self
    }

    pub fn order_asc(mut self, column: &str) -> Self {
        self.order = Some((column.to_owned(), Direction::Ascending));
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some((column.to_owned(), Direction::Descending));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_collects_filters_in_order() {
        let query = Query::new()
            .eq("user_id", "u-1")
            .ilike_any(&["name", "city"], "knee")
            .order_asc("name")
            .limit(5);

        assert_eq!(query.filters.len(), 2);
        assert!(matches!(
            &query.filters[0],
            Filter::Eq { column, value } if column == "user_id" && *value == json!("u-1")
        ));
        let (column, direction) = query.order.expect("order set");
        assert_eq!(column, "name");
        assert_eq!(direction, Direction::Ascending);
        assert_eq!(query.limit, Some(5));
    }
}
