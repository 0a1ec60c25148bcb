//! Rating column: a whole or decimal number, kept in the shape it was written.

use super::ItemContext;
use crate::readlog::error::{ParseError, Result};
use crate::readlog::grammar::ColumnKind;
use crate::readlog::item::Rating;

pub fn extract(ctx: &ItemContext<'_, '_>) -> Result<Option<Rating>> {
    let Some(column) = ctx.row.column(ColumnKind::Rating) else {
        return Ok(ctx.template().item.rating);
    };
    column.ensure_matched()?;

    let Some(text) = column.segments().find_map(|s| s.fields.scalar("rating")) else {
        return Ok(ctx.template().item.rating);
    };
    parse_rating(text).map(Some)
}

fn parse_rating(text: &str) -> Result<Rating> {
    let invalid = || ParseError::unparsable("rating", text, "expected a number");
    if text.contains('.') {
        text.parse().map(Rating::Decimal).map_err(|_| invalid())
    } else {
        text.parse().map(Rating::Integer).map_err(|_| invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readlog::config::Config;
    use crate::readlog::error::ErrorKind;
    use crate::readlog::grammar::Grammar;
    use crate::readlog::parsing::{parse_row, RowOutcome};

    fn rating_of(line: &str) -> Result<Option<Rating>> {
        let grammar = Grammar::compile(Config::defaults().unwrap()).unwrap();
        let items = parse_row(line, &grammar).map(RowOutcome::into_items)?;
        Ok(items[0].rating)
    }

    #[test]
    fn test_integer_and_decimal_ratings() {
        assert_eq!(rating_of("4|📕A Title").unwrap(), Some(Rating::Integer(4)));
        assert_eq!(rating_of("4.5|📕A Title").unwrap(), Some(Rating::Decimal(4.5)));
    }

    #[test]
    fn test_blank_rating_is_none() {
        assert_eq!(rating_of("|📕A Title").unwrap(), None);
        assert_eq!(rating_of("📕A Title").unwrap(), None);
    }

    #[test]
    fn test_non_numeric_rating_is_an_error() {
        let err = rating_of("great|📕A Title").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnparsableExplicitValue);
    }
}
