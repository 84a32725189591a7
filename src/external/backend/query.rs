//! Row filters and ordering understood by the row store.

use serde_json::Value;

/// Comparison applied to one column.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(String),
    In(Vec<String>),
    IsNull,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub condition: Condition,
}

impl Filter {
    /// Renders the filter value in REST query syntax, e.g. `eq.5` or
    /// `in.(1,2)`.
    pub fn to_param(&self) -> String {
        match &self.condition {
            Condition::Eq(v) => format!("eq.{v}"),
            Condition::In(values) => {
                let items: Vec<String> = values.iter().map(|v| quote_list_item(v)).collect();
                format!("in.({})", items.join(","))
            }
            Condition::IsNull => "is.null".to_string(),
        }
    }

    /// Evaluates the filter against a JSON row.
    pub fn matches(&self, row: &Value) -> bool {
        let cell = row.get(&self.column).unwrap_or(&Value::Null);
        match &self.condition {
            Condition::Eq(v) => cell_text(cell).is_some_and(|c| &c == v),
            Condition::In(values) => cell_text(cell).is_some_and(|c| values.contains(&c)),
            Condition::IsNull => cell.is_null(),
        }
    }
}

fn quote_list_item(value: &str) -> String {
    if value.contains([',', '(', ')', '"', ' ']) {
        format!("\"{}\"", value.replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

/// Text form of a scalar cell; `None` for null, arrays and objects.
pub(crate) fn cell_text(cell: &Value) -> Option<String> {
    match cell {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// Filters, ordering and paging for a select or update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    fn filter(mut self, column: &str, condition: Condition) -> Self {
        self.filters.push(Filter {
            column: column.to_string(),
            condition,
        });
        self
    }

    pub fn eq(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, Condition::Eq(value.to_string()))
    }

    pub fn in_list<T: ToString>(self, column: &str, values: impl IntoIterator<Item = T>) -> Self {
        let values = values.into_iter().map(|v| v.to_string()).collect();
        self.filter(column, Condition::In(values))
    }

    pub fn is_null(self, column: &str) -> Self {
        self.filter(column, Condition::IsNull)
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }

    /// Query string pairs for the REST interface, `select=*` included.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(
            self.filters
                .iter()
                .map(|f| (f.column.clone(), f.to_param())),
        );
        if let Some(order) = &self.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{}.{direction}", order.column)));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_params_rendering() {
        let query = Query::new()
            .eq("id", 5)
            .in_list("status", ["submitted", "in_review"])
            .in_list("category_id", [1, 2])
            .is_null("deleted_at")
            .order_by("created_at", false)
            .limit(20)
            .offset(40);

        assert_eq!(
            query.to_params(),
            vec![
                ("select".to_string(), "*".to_string()),
                ("id".to_string(), "eq.5".to_string()),
                ("status".to_string(), "in.(submitted,in_review)".to_string()),
                ("category_id".to_string(), "in.(1,2)".to_string()),
                ("deleted_at".to_string(), "is.null".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "20".to_string()),
                ("offset".to_string(), "40".to_string()),
            ]
        );
    }

    #[test]
    fn test_in_list_quotes_reserved_characters() {
        let query = Query::new().in_list("name", ["a,b", "c"]);
        assert_eq!(query.filters[0].to_param(), "in.(\"a,b\",c)");
    }

    #[test]
    fn test_matches_rows() {
        let row = json!({"id": 5, "status": "submitted", "user_id": null, "is_active": true});

        assert!(Query::new().eq("id", 5).matches(&row));
        assert!(Query::new().in_list("status", ["submitted", "in_review"]).matches(&row));
        assert!(Query::new().is_null("user_id").matches(&row));
        assert!(Query::new().is_null("missing").matches(&row));
        assert!(Query::new().eq("is_active", true).matches(&row));
        assert!(!Query::new().in_list("status", ["approved"]).matches(&row));
        assert!(!Query::new().eq("user_id", "x").matches(&row));
        assert!(Query::new().in_list("id", [4, 5]).matches(&row));
    }
}
