//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::ParseError;
use crate::layout::{Inset, Side};
use crate::parser::ast::SideList;
use crate::parser::lexer::{self, Token};

type Extra<'a> = extra::Err<Rich<'a, Token>>;

/// Lex `$input`, feed the tokens to `$parser` and collect errors
macro_rules! run_parser {
    ($input:expr, $parser:expr) => {{
        let input: &str = $input;
        let len = input.len();

        let tokens = lexer::lex(input).map_err(|e| vec![e])?;
        let token_iter = tokens
            .into_iter()
            .map(|(tok, span)| (tok, SimpleSpan::from(span)));

        // Turn the token iterator into a stream that chumsky can use
        let token_stream =
            Stream::from_iter(token_iter).map((len..len).into(), |(t, s): (_, _)| (t, s));

        $parser
            .parse(token_stream)
            .into_result()
            .map_err(|errs| errs.into_iter().map(ParseError::from).collect::<Vec<_>>())
    }};
}

/// Parse a single inset value such as `2mm`, `10px`, `25%`, `auto` or `10`
pub fn parse_inset(input: &str) -> Result<Inset, Vec<ParseError>> {
    run_parser!(input, inset_value().then_ignore(end()))
}

/// Parse a full inset list, positional (`"0 auto"`) or labeled (`"top:2mm; left:auto"`)
pub fn parse_insets(input: &str) -> Result<SideList<Inset>, Vec<ParseError>> {
    run_parser!(input, side_list(inset_value()))
}

/// Parse anchor sibling indices; negative indices mean "no anchor"
pub fn parse_anchor_indices(input: &str) -> Result<SideList<Option<usize>>, Vec<ParseError>> {
    run_parser!(
        input,
        side_list(integer().map(|n| usize::try_from(n).ok()))
    )
}

/// Parse anchor positions (0 = near edge of the anchor, 1 = far edge)
pub fn parse_anchor_positions(input: &str) -> Result<SideList<f32>, Vec<ParseError>> {
    run_parser!(input, side_list(number().map(|n| n as f32)))
}

fn integer<'a, I>() -> impl Parser<'a, I, i64, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    select! {
        Token::Integer(n) => n,
    }
}

fn number<'a, I>() -> impl Parser<'a, I, f64, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    select! {
        Token::Integer(n) => n as f64,
        Token::Float(f) => f,
    }
}

fn inset_value<'a, I>() -> impl Parser<'a, I, Inset, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    // Pixels are whole numbers; `2.5px` is rejected
    let pixels = integer().try_map(|n, span| {
        i32::try_from(n).map_err(|_| Rich::custom(span, "pixel value out of range"))
    });

    choice((
        pixels.clone().then_ignore(just(Token::Px)).map(Inset::Px),
        number()
            .then_ignore(just(Token::Mm))
            .map(|v| Inset::Mm(v as f32)),
        number()
            .then_ignore(just(Token::Percent))
            .map(|v| Inset::Percent(v as f32)),
        just(Token::Auto).to(Inset::Auto),
        // A bare number is pixels
        pixels.map(Inset::Px),
    ))
}

/// 1-4 positional values, or one or more `side:value` entries separated by `;`
fn side_list<'a, I, T>(
    value: impl Parser<'a, I, T, Extra<'a>> + Clone,
) -> impl Parser<'a, I, SideList<T>, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
    T: Clone + 'a,
{
    let side = choice((
        just(Token::Top).to(Side::Top),
        just(Token::Right).to(Side::Right),
        just(Token::Bottom).to(Side::Bottom),
        just(Token::Left).to(Side::Left),
    ));

    let labeled = side
        .then_ignore(just(Token::Colon))
        .then(value.clone())
        .separated_by(just(Token::Semicolon))
        .allow_trailing()
        .at_least(1)
        .collect::<Vec<_>>()
        .map(SideList::Labeled);

    let positional = value
        .repeated()
        .at_least(1)
        .at_most(4)
        .collect::<Vec<_>>()
        .map(SideList::Positional);

    choice((labeled, positional)).then_ignore(end())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_single_values() {
        assert_eq!(parse_inset("2mm").unwrap(), Inset::Mm(2.0));
        assert_eq!(parse_inset("1.5mm").unwrap(), Inset::Mm(1.5));
        assert_eq!(parse_inset("10px").unwrap(), Inset::Px(10));
        assert_eq!(parse_inset("-3px").unwrap(), Inset::Px(-3));
        assert_eq!(parse_inset("25%").unwrap(), Inset::Percent(25.0));
        assert_eq!(parse_inset("auto").unwrap(), Inset::Auto);
        assert_eq!(parse_inset("7").unwrap(), Inset::Px(7));
    }

    #[test]
    fn test_fractional_pixels_rejected() {
        assert!(parse_inset("2.5px").is_err());
        assert!(parse_inset("2.5").is_err());
    }

    #[test]
    fn test_parse_positional() {
        let list = parse_insets("0 auto 10%").unwrap();
        assert_eq!(
            list,
            SideList::Positional(vec![Inset::Px(0), Inset::Auto, Inset::Percent(10.0)])
        );
    }

    #[test]
    fn test_too_many_values_rejected() {
        assert!(parse_insets("1 2 3 4 5").is_err());
        assert!(parse_insets("").is_err());
    }

    #[test]
    fn test_parse_labeled() {
        let list = parse_insets("right:auto; top:2mm;").unwrap();
        assert_eq!(
            list,
            SideList::Labeled(vec![(Side::Right, Inset::Auto), (Side::Top, Inset::Mm(2.0))])
        );
    }

    #[test]
    fn test_labeled_rejects_garbage_value() {
        let errs = parse_insets("top:2mm; left:px").unwrap_err();
        assert!(!errs.is_empty());
    }

    #[test]
    fn test_parse_anchor_indices() {
        let list = parse_anchor_indices("-1 3 0").unwrap();
        assert_eq!(list, SideList::Positional(vec![None, Some(3), Some(0)]));

        let list = parse_anchor_indices("left:2").unwrap();
        assert_eq!(list, SideList::Labeled(vec![(Side::Left, Some(2))]));
    }

    #[test]
    fn test_parse_anchor_positions() {
        let list = parse_anchor_positions("1 0.5").unwrap();
        assert_eq!(list, SideList::Positional(vec![1.0, 0.5]));
    }
}
