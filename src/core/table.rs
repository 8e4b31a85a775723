//! Column-oriented data table with role-based column lookup.
//!
//! VSM files name their columns inconsistently (`Field(G)`, `B`, `B(mT)`,
//! `Moment(emu)`, `m`, ...). Instead of matching names ad hoc at every call
//! site, a [`RoleMap`] is resolved once per table and maps each physical
//! role to the single column that provides it.

use std::fmt;

use thiserror::Error;

/// Errors that can occur during table operations.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("No column recognized for {0}")]
    MissingColumn(ColumnRole),
}

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, TableError>;

/// A named numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name as it appears in the file header (or after renaming).
    pub name: String,
    /// One value per measurement sample.
    pub values: Vec<f64>,
}

/// An ordered sequence of equal-length named numeric columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    /// Columns in header order.
    pub columns: Vec<Column>,
}

impl DataTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Returns the number of rows (length of the first column).
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Returns the number of columns.
    #[inline]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the table has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Returns the column with the given name, if present.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns a mutable reference to the column with the given name.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Returns all column names in header order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Renames a column. Returns true if a column with the old name existed.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_mut(from) {
            Some(col) => {
                col.name = to.to_string();
                true
            }
            None => false,
        }
    }
}

/// Physical role a column can play in a VSM measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    /// Applied magnetic field (`Field...` or `B`)
    Field,
    /// Magnetic moment (`Moment...` or `m`)
    Moment,
    /// Sample temperature (`Temp...` or `T`)
    Temperature,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnRole::Field => "field column",
            ColumnRole::Moment => "moment column",
            ColumnRole::Temperature => "temperature column",
        };
        write!(f, "{}", name)
    }
}

/// Mapping from column roles to the column names providing them.
///
/// Resolved once per table. For each role the first matching column in
/// header order wins; a column fills at most one role. Unresolved roles
/// stay `None` and surface as [`TableError::MissingColumn`] via
/// [`RoleMap::require`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleMap {
    /// Name of the field column, if recognized.
    pub field: Option<String>,
    /// Name of the moment column, if recognized.
    pub moment: Option<String>,
    /// Name of the temperature column, if recognized.
    pub temperature: Option<String>,
}

impl RoleMap {
    /// Resolve the role mapping for a table.
    ///
    /// Candidate patterns per role, checked in order for each column:
    /// - Field: name starts with `Field`, or is `B` optionally followed by
    ///   a non-word character (e.g. `B(mT)`)
    /// - Moment: name starts with `Moment`, or is `m` likewise
    /// - Temperature: name starts with `Temp`, or is `T` likewise
    pub fn resolve(table: &DataTable) -> Self {
        let mut map = RoleMap::default();

        for col in &table.columns {
            let name = col.name.as_str();

            if map.field.is_none() && matches_role(name, ColumnRole::Field) {
                map.field = Some(name.to_string());
            } else if map.moment.is_none() && matches_role(name, ColumnRole::Moment) {
                map.moment = Some(name.to_string());
            } else if map.temperature.is_none() && matches_role(name, ColumnRole::Temperature) {
                map.temperature = Some(name.to_string());
            }
        }

        map
    }

    /// Returns the column name resolved for a role, if any.
    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        match role {
            ColumnRole::Field => self.field.as_deref(),
            ColumnRole::Moment => self.moment.as_deref(),
            ColumnRole::Temperature => self.temperature.as_deref(),
        }
    }

    /// Returns the column name resolved for a role, or `MissingColumn`.
    pub fn require(&self, role: ColumnRole) -> Result<&str> {
        self.get(role).ok_or(TableError::MissingColumn(role))
    }
}

/// Check whether a column name matches a role's candidate patterns.
fn matches_role(name: &str, role: ColumnRole) -> bool {
    match role {
        ColumnRole::Field => name.starts_with("Field") || matches_short(name, 'B'),
        ColumnRole::Moment => name.starts_with("Moment") || matches_short(name, 'm'),
        ColumnRole::Temperature => name.starts_with("Temp") || matches_short(name, 'T'),
    }
}

/// Match a bare short name: the letter alone, or followed by a non-word
/// character such as `(` (so `B` and `B(mT)` match but `Bias` does not).
fn matches_short(name: &str, letter: char) -> bool {
    let mut chars = name.chars();
    if chars.next() != Some(letter) {
        return false;
    }
    match chars.next() {
        None => true,
        Some(next) => !next.is_alphanumeric() && next != '_',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_columns(names: &[&str]) -> DataTable {
        DataTable {
            columns: names
                .iter()
                .map(|n| Column {
                    name: n.to_string(),
                    values: vec![1.0, 2.0],
                })
                .collect(),
        }
    }

    #[test]
    fn test_num_rows_and_columns() {
        let table = table_with_columns(&["B", "m", "T"]);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.num_columns(), 3);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_rename_column() {
        let mut table = table_with_columns(&["Field(G)"]);
        assert!(table.rename_column("Field(G)", "B"));
        assert!(table.column("B").is_some());
        assert!(table.column("Field(G)").is_none());
        assert!(!table.rename_column("Field(G)", "B"));
    }

    #[test]
    fn test_resolve_long_names() {
        let table = table_with_columns(&["Field(G)", "Moment(emu)", "Temperature(K)"]);
        let roles = RoleMap::resolve(&table);

        assert_eq!(roles.field.as_deref(), Some("Field(G)"));
        assert_eq!(roles.moment.as_deref(), Some("Moment(emu)"));
        assert_eq!(roles.temperature.as_deref(), Some("Temperature(K)"));
    }

    #[test]
    fn test_resolve_short_names() {
        let table = table_with_columns(&["B", "m", "T"]);
        let roles = RoleMap::resolve(&table);

        assert_eq!(roles.field.as_deref(), Some("B"));
        assert_eq!(roles.moment.as_deref(), Some("m"));
        assert_eq!(roles.temperature.as_deref(), Some("T"));
    }

    #[test]
    fn test_resolve_short_names_with_units() {
        let table = table_with_columns(&["B(mT)", "m(Am2)", "T(C)"]);
        let roles = RoleMap::resolve(&table);

        assert_eq!(roles.field.as_deref(), Some("B(mT)"));
        assert_eq!(roles.moment.as_deref(), Some("m(Am2)"));
        assert_eq!(roles.temperature.as_deref(), Some("T(C)"));
    }

    #[test]
    fn test_resolve_rejects_prefixed_words() {
        // "Bias" and "mass" must not be mistaken for field/moment columns
        let table = table_with_columns(&["Bias", "mass", "Time"]);
        let roles = RoleMap::resolve(&table);

        assert!(roles.field.is_none());
        assert!(roles.moment.is_none());
        assert!(roles.temperature.is_none());
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let table = table_with_columns(&["Field(G)", "B"]);
        let roles = RoleMap::resolve(&table);

        assert_eq!(roles.field.as_deref(), Some("Field(G)"));
    }

    #[test]
    fn test_require_missing_column() {
        let table = table_with_columns(&["B", "m"]);
        let roles = RoleMap::resolve(&table);

        assert!(roles.require(ColumnRole::Field).is_ok());
        assert!(matches!(
            roles.require(ColumnRole::Temperature),
            Err(TableError::MissingColumn(ColumnRole::Temperature))
        ));
    }
}
