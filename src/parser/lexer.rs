//! Lexer for the constraint text format using logos

use logos::Logos;

use crate::error::ParseError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Side labels
    #[token("top")]
    Top,
    #[token("right")]
    Right,
    #[token("bottom")]
    Bottom,
    #[token("left")]
    Left,

    // Units
    #[token("px")]
    Px,
    #[token("mm")]
    Mm,
    #[token("%")]
    Percent,
    #[token("auto")]
    Auto,

    // Delimiters
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,

    // Literals
    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Integer(i64),

    #[regex(r"-?[0-9]*\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),
}

/// Lex input string into tokens with spans.
///
/// Unlike a lenient lexer this rejects the whole input on the first
/// unrecognized character, so `1x 2` can never be read as `1 2`.
pub fn lex(input: &str) -> Result<Vec<(Token, Span)>, ParseError> {
    Token::lexer(input)
        .spanned()
        .map(|(tok, span)| match tok {
            Ok(t) => Ok((t, span)),
            Err(()) => Err(ParseError::Syntax {
                message: format!("Unrecognized input '{}'", &input[span.clone()]),
                span,
                expected: vec![],
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_values_with_units() {
        assert_eq!(
            tokens("2mm 10px 25% auto"),
            vec![
                Token::Integer(2),
                Token::Mm,
                Token::Integer(10),
                Token::Px,
                Token::Integer(25),
                Token::Percent,
                Token::Auto,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("42 3.5 -10 -0.25 .5"),
            vec![
                Token::Integer(42),
                Token::Float(3.5),
                Token::Integer(-10),
                Token::Float(-0.25),
                Token::Float(0.5),
            ]
        );
    }

    #[test]
    fn test_labeled_form() {
        assert_eq!(
            tokens("top:1mm; left:auto;"),
            vec![
                Token::Top,
                Token::Colon,
                Token::Integer(1),
                Token::Mm,
                Token::Semicolon,
                Token::Left,
                Token::Colon,
                Token::Auto,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_unknown_input_rejected() {
        let err = lex("1px 2em").unwrap_err();
        match err {
            ParseError::Syntax { span, .. } => assert_eq!(span.start, 5),
        }
    }
}
