//! Tabla columnar mínima: columnas con nombre, tipadas y de igual longitud.
use serde::{Deserialize, Serialize};

use super::ShapeError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Str(Vec<String>),
    Bool(Vec<bool>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Str(v) => v.len(),
            Self::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedColumn {
    pub name: String,
    pub data: Column,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<NamedColumn>,
}

impl Table {
    /// Tabla vacía (sin columnas, cero filas).
    pub fn new() -> Self {
        Self::default()
    }

    /// Añade una columna. Falla si el nombre se repite o la longitud no
    /// coincide con las columnas existentes.
    pub fn with_column(mut self, name: impl Into<String>, data: Column) -> Result<Self, ShapeError> {
        let name = name.into();
        if self.column(&name).is_some() {
            return Err(ShapeError(format!("duplicate column '{name}'")));
        }
        if let Some(first) = self.columns.first() {
            if first.data.len() != data.len() {
                return Err(ShapeError(format!("column '{name}' has {} rows, table has {}",
                                              data.len(),
                                              first.data.len())));
            }
        }
        self.columns.push(NamedColumn { name, data });
        Ok(self)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name).map(|c| &c.data)
    }

    pub fn columns(&self) -> &[NamedColumn] {
        &self.columns
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.data.len()).unwrap_or(0)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}
