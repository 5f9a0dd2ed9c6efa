//! Widget body projection — decides what a widget card shows.
//!
//! Resolution order, first match wins:
//! 1. a fixed chart registered for the widget id in the `ChartCatalog`
//! 2. `type: "donut"`, using the widget's own `data` / `options`
//! 3. the widget's `content` as plain text

use std::borrow::Cow;

use crate::board::{Widget, WidgetKind};
use crate::chart::{ChartCatalog, ChartData, ChartOptions};

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetBody<'a> {
    Chart {
        data: Cow<'a, ChartData>,
        options: Cow<'a, ChartOptions>,
    },
    Text(&'a str),
}

impl WidgetBody<'_> {
    pub fn is_chart(&self) -> bool {
        matches!(self, Self::Chart { .. })
    }
}

pub fn project<'a>(widget: &'a Widget, catalog: &'a ChartCatalog) -> WidgetBody<'a> {
    if let Some(fixed) = catalog.get(&widget.id) {
        return WidgetBody::Chart {
            data: Cow::Borrowed(&fixed.data),
            options: Cow::Borrowed(&fixed.options),
        };
    }

    if widget.kind == Some(WidgetKind::Donut) {
        let data = match &widget.data {
            Some(d) => Cow::Borrowed(d),
            None => Cow::Owned(ChartData::default()),
        };
        let options = match &widget.options {
            Some(o) => Cow::Borrowed(o),
            None => Cow::Owned(ChartOptions::default()),
        };
        return WidgetBody::Chart { data, options };
    }

    WidgetBody::Text(&widget.content)
}
