//! Board — the category/widget collection and its pure operations.
//!
//! Every operation takes `&self` and returns a new `Board`. The input
//! snapshot is never touched. Categories are held behind `Arc`, so a new
//! snapshot shares every category it did not change with the old one:
//! `Arc::ptr_eq` on a category is a valid "did this change?" check.
//!
//! The lenient operations (`add_widget`, `remove_widget`) turn every edge
//! case into a no-op. The `try_*` variants report why nothing happened.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chart::{ChartData, ChartOptions};

/// Why a strict board operation left the board unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("widget name is empty")]
    EmptyName,
    #[error("no category with id {0:?}")]
    UnknownCategory(String),
    #[error("category {category:?} has {len} widgets, index {index} is out of range")]
    IndexOutOfRange {
        category: String,
        index: usize,
        len: usize,
    },
}

/// Declared chart kind of a seed widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Donut,
    /// Any kind this dashboard does not draw; rendered as text.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<WidgetKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ChartData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ChartOptions>,
}

impl Widget {
    /// A user-added widget: id derived from the name, empty content, no chart.
    pub fn named(name: &str) -> Self {
        Self {
            id: widget_id_from_name(name),
            name: name.to_string(),
            content: String::new(),
            kind: None,
            data: None,
            options: None,
        }
    }

    pub fn is_chart(&self) -> bool {
        self.kind.is_some() || self.data.is_some() || self.options.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            widgets: Vec::new(),
        }
    }
}

// Literal pattern; `Regex::new` cannot fail on it.
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Lower-case the name and collapse each whitespace run into one `-`.
///
/// Leading and trailing whitespace are not trimmed: `" a"` becomes `"-a"`.
pub fn widget_id_from_name(name: &str) -> String {
    WHITESPACE.replace_all(&name.to_lowercase(), "-").into_owned()
}

/// An immutable snapshot of the dashboard's categories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    categories: Vec<Arc<Category>>,
}

impl Board {
    /// Build a board from categories. Callers are responsible for id
    /// uniqueness; `Seed::into_board` checks it.
    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            categories: categories.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn categories(&self) -> &[Arc<Category>] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn category(&self, id: &str) -> Option<&Arc<Category>> {
        self.categories.iter().find(|c| c.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.id == id)
    }

    /// Append `New Category <n+1>` with id `category-<n+1>`, `n` being the
    /// current number of categories.
    pub fn add_category(&self) -> Board {
        let n = self.categories.len() + 1;
        let category = Category::new(format!("category-{}", n), format!("New Category {}", n));
        let mut categories = self.categories.clone();
        categories.push(Arc::new(category));
        Board { categories }
    }

    /// Append a widget named `raw_name` to the category. Empty or missing
    /// name and unknown category leave the board unchanged.
    pub fn add_widget(&self, category_id: &str, raw_name: Option<&str>) -> Board {
        self.try_add_widget(category_id, raw_name)
            .unwrap_or_else(|_| self.clone())
    }

    pub fn try_add_widget(&self, category_id: &str, raw_name: Option<&str>) -> Result<Board, BoardError> {
        let name = raw_name
            .filter(|n| !n.is_empty())
            .ok_or(BoardError::EmptyName)?;
        let pos = self
            .position(category_id)
            .ok_or_else(|| BoardError::UnknownCategory(category_id.to_string()))?;

        let mut categories = self.categories.clone();
        // The old snapshot still holds this Arc, so make_mut copies it.
        Arc::make_mut(&mut categories[pos])
            .widgets
            .push(Widget::named(name));
        Ok(Board { categories })
    }

    /// Remove the widget at `index` from the category. Out-of-range index
    /// and unknown category leave the board unchanged.
    pub fn remove_widget(&self, category_id: &str, index: usize) -> Board {
        self.try_remove_widget(category_id, index)
            .unwrap_or_else(|_| self.clone())
    }

    pub fn try_remove_widget(&self, category_id: &str, index: usize) -> Result<Board, BoardError> {
        let pos = self
            .position(category_id)
            .ok_or_else(|| BoardError::UnknownCategory(category_id.to_string()))?;
        let len = self.categories[pos].widgets.len();
        if index >= len {
            return Err(BoardError::IndexOutOfRange {
                category: category_id.to_string(),
                index,
                len,
            });
        }

        let mut categories = self.categories.clone();
        Arc::make_mut(&mut categories[pos]).widgets.remove(index);
        Ok(Board { categories })
    }
}
