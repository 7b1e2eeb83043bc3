pub mod error;
pub mod order;
pub mod types;

pub use error::QueryError;
pub use order::QueryOrder;
pub use types::*;

/// A read against one gateway table: projection, row filters, ordering and a row window.
///
/// Filtering and sorting happen server-side; this only describes the request.
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    table: String,
    columns: Vec<String>,
    filters: Vec<FilterInfo>,
    order: Vec<OrderInfo>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl TableQuery {
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn filter(mut self, column: impl Into<String>, operator: FilterOp, value: impl Into<String>) -> Self {
        self.filters.push(FilterInfo {
            column: column.into(),
            operator,
            value: value.into(),
        });
        self
    }

    pub fn eq(self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter(column, FilterOp::Eq, value)
    }

    pub fn is_in<I, V>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let joined = values.into_iter().map(Into::into).collect::<Vec<String>>().join(",");
        self.filter(column, FilterOp::In, joined)
    }

    pub fn order_by(mut self, column: impl Into<String>, sort: SortDirection) -> Self {
        self.order.push(OrderInfo { column: column.into(), sort });
        self
    }

    pub fn with_order(mut self, order: Vec<OrderInfo>) -> Self {
        self.order.extend(order);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Rows to skip before the first one returned; pair with `limit` and a stable order to page
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn order(&self) -> &[OrderInfo] {
        &self.order
    }

    /// Check every identifier before anything goes on the wire
    pub fn validate(&self) -> Result<(), QueryError> {
        if !is_identifier(&self.table) {
            return Err(QueryError::InvalidTableName(self.table.clone()));
        }

        let filter_columns = self.filters.iter().map(|f| &f.column);
        let order_columns = self.order.iter().map(|o| &o.column);
        for column in self.columns.iter().chain(filter_columns).chain(order_columns) {
            if !is_identifier(column) {
                return Err(QueryError::InvalidColumn(column.clone()));
            }
        }

        for f in &self.filters {
            if f.operator == FilterOp::In && f.value.is_empty() {
                return Err(QueryError::EmptyList(f.column.clone()));
            }
        }
        Ok(())
    }

    /// Query-string parameters in a stable order: select, filters, order, limit, offset
    pub fn to_params(&self) -> Result<Vec<(String, String)>, QueryError> {
        self.validate()?;

        let mut params = Vec::new();
        let select = if self.columns.is_empty() { "*".to_string() } else { self.columns.join(",") };
        params.push(("select".to_string(), select));

        for f in &self.filters {
            let value = match f.operator {
                FilterOp::In => format!("in.({})", f.value),
                op => format!("{}.{}", op.as_param(), f.value),
            };
            params.push((f.column.clone(), value));
        }

        if !self.order.is_empty() {
            params.push(("order".to_string(), QueryOrder::generate(&self.order)));
        }

        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }

        Ok(params)
    }
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
