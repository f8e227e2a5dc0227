//! Parameterized query construction for the songs table.
//!
//! Values never end up in SQL text. Each bound value allocates the next
//! `?N` placeholder at the moment it is pushed, so the order of
//! [`BoundQuery::values`] always matches the placeholder numbering.

use rusqlite::types::Value;

use super::models::Page;

/// Columns of the songs table that queries may reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SongColumn {
    Id,
    Title,
    Artist,
    ReleaseDate,
    Link,
}

impl SongColumn {
    pub const fn name(&self) -> &'static str {
        match self {
            SongColumn::Id => "id",
            SongColumn::Title => "song",
            SongColumn::Artist => "artist",
            SongColumn::ReleaseDate => "release_date",
            SongColumn::Link => "link",
        }
    }
}

/// Ordered set of present (column, value) pairs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldSet {
    fields: Vec<(SongColumn, Value)>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `column` only if `value` is present.
    pub fn with<V: Into<Value>>(mut self, column: SongColumn, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.fields.push((column, value.into()));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

}

/// SQL text together with the values for its placeholders.
#[derive(Debug, PartialEq)]
pub struct BoundQuery {
    pub sql: String,
    pub values: Vec<Value>,
}

pub struct QueryBuilder {
    sql: String,
    values: Vec<Value>,
    has_where: bool,
}

impl QueryBuilder {
    pub fn new<S: Into<String>>(head: S) -> Self {
        Self {
            sql: head.into(),
            values: Vec::new(),
            has_where: false,
        }
    }

    fn bind(&mut self, value: Value) -> String {
        self.values.push(value);
        format!("?{}", self.values.len())
    }

    fn push_assignments(&mut self, fields: FieldSet, separator: &str) {
        let rendered: Vec<String> = fields
            .fields
            .into_iter()
            .map(|(column, value)| format!("{} = {}", column.name(), self.bind(value)))
            .collect();
        self.sql.push_str(&rendered.join(separator));
    }

    /// `SET a = ?1, b = ?2`. An empty set renders nothing; callers must not
    /// execute an UPDATE built from one.
    pub fn set_all(mut self, fields: FieldSet) -> Self {
        if fields.is_empty() {
            return self;
        }
        self.sql.push_str(" SET ");
        self.push_assignments(fields, ", ");
        self
    }

    /// AND-joins every present filter. No filters, no WHERE.
    pub fn where_all(mut self, filters: FieldSet) -> Self {
        if filters.is_empty() {
            return self;
        }
        self.sql
            .push_str(if self.has_where { " AND " } else { " WHERE " });
        self.has_where = true;
        self.push_assignments(filters, " AND ");
        self
    }

    pub fn where_eq<V: Into<Value>>(self, column: SongColumn, value: V) -> Self {
        self.where_all(FieldSet::new().with(column, Some(value)))
    }

    /// Deterministic ordering followed by the page window.
    pub fn order_by_page(mut self, column: SongColumn, page: Page) -> Self {
        let limit = self.bind(Value::Integer(page.limit as i64));
        let offset = self.bind(Value::Integer(page.offset as i64));
        self.sql.push_str(&format!(
            " ORDER BY {} ASC LIMIT {} OFFSET {}",
            column.name(),
            limit,
            offset
        ));
        self
    }

    pub fn build(self) -> BoundQuery {
        BoundQuery {
            sql: self.sql,
            values: self.values,
        }
    }
}
