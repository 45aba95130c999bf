use fixtree_core::{ConditionValue, Conditions, NodeOptions, Value};
use sea_query::{Alias, Expr, Order, SelectStatement};

use super::helpers::to_sea_value;
use crate::error::QueryError;

/// One `ORDER BY` term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }
}

/// Parse an order clause such as `"created_at DESC, id"`.
///
/// Directions are case-insensitive and default to ascending.
pub fn parse_order(order: &str) -> Result<Vec<OrderBy>, QueryError> {
    let mut terms = Vec::new();
    for part in order.split(',') {
        let mut words = part.split_whitespace();
        let Some(column) = words.next() else {
            if order.trim().is_empty() {
                continue;
            }
            return Err(QueryError::InvalidOrder(
                order.to_string(),
                "empty term".to_string(),
            ));
        };
        let descending = match words.next() {
            None => false,
            Some(dir) if dir.eq_ignore_ascii_case("asc") => false,
            Some(dir) if dir.eq_ignore_ascii_case("desc") => true,
            Some(dir) => {
                return Err(QueryError::InvalidOrder(
                    order.to_string(),
                    format!("unknown direction '{dir}'"),
                ));
            }
        };
        if let Some(extra) = words.next() {
            return Err(QueryError::InvalidOrder(
                order.to_string(),
                format!("unexpected '{extra}'"),
            ));
        }
        terms.push(OrderBy {
            column: column.to_string(),
            descending,
        });
    }
    Ok(terms)
}

/// Query-side filters for a select: `where`, `order` and `limit`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectFilter {
    pub conditions: Option<Conditions>,
    pub order: Vec<OrderBy>,
    pub limit: Option<u64>,
}

impl SelectFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the query-side part of a template node's options.
    pub fn from_options(options: Option<&NodeOptions>) -> Result<Self, QueryError> {
        let Some(options) = options else {
            return Ok(Self::default());
        };
        let order = match options.order.as_deref() {
            Some(order) => parse_order(order)?,
            None => Vec::new(),
        };
        Ok(Self {
            conditions: options.conditions.clone(),
            order,
            limit: options.limit,
        })
    }

    pub fn with_conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = Some(conditions);
        self
    }

    pub fn with_order(mut self, order: &str) -> Result<Self, QueryError> {
        self.order = parse_order(order)?;
        Ok(self)
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_none() && self.order.is_empty() && self.limit.is_none()
    }

    pub(crate) fn apply(&self, stmt: &mut SelectStatement) {
        match &self.conditions {
            Some(Conditions::Sql(sql)) => {
                stmt.and_where(Expr::cust(sql.clone()));
            }
            Some(Conditions::Columns(columns)) => {
                for (name, value) in columns {
                    let condition = match value {
                        ConditionValue::Eq(Value::Null) => column(name).is_null(),
                        ConditionValue::Eq(value) => column(name).eq(to_sea_value(value)),
                        ConditionValue::Any(values) => {
                            column(name).is_in(values.iter().map(to_sea_value))
                        }
                    };
                    stmt.and_where(condition);
                }
            }
            None => {}
        }

        for term in &self.order {
            let order = if term.descending {
                Order::Desc
            } else {
                Order::Asc
            };
            stmt.order_by_expr(column(&term.column).into(), order);
        }

        if let Some(limit) = self.limit {
            stmt.limit(limit);
        }
    }
}

/// Column expression; `table.column` is qualified.
pub(crate) fn column(name: &str) -> Expr {
    match name.split_once('.') {
        Some((table, col)) => Expr::col((Alias::new(table), Alias::new(col))),
        None => Expr::col(Alias::new(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("id", vec![OrderBy::asc("id")])]
    #[case("created_at DESC, id", vec![OrderBy::desc("created_at"), OrderBy::asc("id")])]
    #[case("name asc,  rank desc", vec![OrderBy::asc("name"), OrderBy::desc("rank")])]
    #[case("", vec![])]
    fn parses_order_clauses(#[case] input: &str, #[case] expected: Vec<OrderBy>) {
        assert_eq!(parse_order(input).unwrap(), expected);
    }

    #[rstest]
    #[case("id sideways")]
    #[case("id desc nulls")]
    #[case("id, , name")]
    fn rejects_bad_order_clauses(#[case] input: &str) {
        let err = parse_order(input).unwrap_err();
        assert!(matches!(err, QueryError::InvalidOrder(_, _)));
    }

    #[test]
    fn from_options_takes_query_side_filters() {
        let options = NodeOptions::default()
            .with_order("id desc")
            .with_limit(3)
            .with_hard_limit(1);
        let filter = SelectFilter::from_options(Some(&options)).unwrap();
        assert_eq!(filter.order, vec![OrderBy::desc("id")]);
        assert_eq!(filter.limit, Some(3));
        assert!(filter.conditions.is_none());
    }

    #[test]
    fn from_no_options_is_empty() {
        assert!(SelectFilter::from_options(None).unwrap().is_empty());
    }
}
