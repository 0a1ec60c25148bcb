//! Custom columns declared in configuration.
//!
//! One generic extractor for all of them, parameterized by the column's kind:
//! numeric columns parse as numbers, text columns keep the trimmed text. A
//! blank or missing value takes the column's declared default.

use super::ItemContext;
use crate::readlog::config::{CustomColumn, CustomKind};
use crate::readlog::error::{ParseError, Result};
use crate::readlog::item::CustomValue;
use std::collections::BTreeMap;

pub fn extract(ctx: &ItemContext<'_, '_>) -> Result<BTreeMap<String, Option<CustomValue>>> {
    let mut values = ctx.template().item.custom.clone();
    for column in &ctx.config().custom_columns {
        let value = match ctx.row.custom_value(&column.name) {
            Some(raw) => Some(coerce(column, raw)?),
            None => column.default.clone(),
        };
        values.insert(column.name.clone(), value);
    }
    Ok(values)
}

fn coerce(column: &CustomColumn, raw: &str) -> Result<CustomValue> {
    match column.kind {
        CustomKind::Numeric => raw
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(CustomValue::Number)
            .ok_or_else(|| {
                ParseError::unparsable(
                    "custom column",
                    raw,
                    format!("{} expects a number", column.name),
                )
            }),
        CustomKind::Text => Ok(CustomValue::Text(raw.trim().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use crate::readlog::config::{Config, CustomColumn, CustomKind};
    use crate::readlog::error::{ErrorKind, Result};
    use crate::readlog::grammar::{ColumnKind, Grammar};
    use crate::readlog::item::{CustomValue, Item};
    use crate::readlog::parsing::{parse_row, RowOutcome};

    fn parse(line: &str) -> Result<Vec<Item>> {
        let mut config = Config::defaults().unwrap();
        config.enabled_columns = vec![ColumnKind::Head];
        config.custom_columns = vec![
            CustomColumn {
                name: "price".into(),
                kind: CustomKind::Numeric,
                default: Some(CustomValue::Number(0.0)),
            },
            CustomColumn {
                name: "shelf".into(),
                kind: CustomKind::Text,
                default: None,
            },
        ];
        let grammar = Grammar::compile(config).unwrap();
        parse_row(line, &grammar).map(RowOutcome::into_items)
    }

    #[test]
    fn test_numeric_and_text_columns() {
        let items = parse("📕A Title|9.99|top").unwrap();
        assert_eq!(items[0].custom["price"], Some(CustomValue::Number(9.99)));
        assert_eq!(items[0].custom["shelf"], Some(CustomValue::Text("top".into())));
    }

    #[test]
    fn test_blank_custom_column_takes_default() {
        let items = parse("📕A Title").unwrap();
        assert_eq!(items[0].custom["price"], Some(CustomValue::Number(0.0)));
        assert_eq!(items[0].custom["shelf"], None);
    }

    #[test]
    fn test_non_numeric_value_is_an_error() {
        let err = parse("📕A Title|cheap").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnparsableExplicitValue);
    }
}
