//! Lexer (C1, part 1): infix string → token stream.
//!
//! Recognizes decimal numbers (at most one `.`), the four binary operators,
//! parentheses, and skips spaces. Fails with `InvalidNumber` on a second `.`
//! within one number, `InvalidCharacter` on anything else unrecognized.

use crate::error::{CalcError, Result};
use crate::types::{Operator, Token};

pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            '+' => {
                tokens.push(Token::Operator(Operator::Add));
                chars.next();
            }
            '-' => {
                tokens.push(Token::Operator(Operator::Sub));
                chars.next();
            }
            '*' | '×' => {
                tokens.push(Token::Operator(Operator::Mul));
                chars.next();
            }
            '/' | '÷' => {
                tokens.push(Token::Operator(Operator::Div));
                chars.next();
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut buf = String::new();
                let mut dot_count = 0;
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_digit() {
                        buf.push(c);
                        chars.next();
                    } else if c == '.' {
                        dot_count += 1;
                        buf.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if dot_count > 1 {
                    return Err(CalcError::InvalidNumber);
                }
                let n: f64 = buf.parse().map_err(|_| CalcError::InvalidNumber)?;
                tokens.push(Token::Number(n));
            }
            other => return Err(CalcError::InvalidCharacter(other)),
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_simple_expression() {
        let tokens = tokenize("2+2*2").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number(2.0),
                Token::Operator(Operator::Add),
                Token::Number(2.0),
                Token::Operator(Operator::Mul),
                Token::Number(2.0),
            ]
        );
    }

    #[test]
    fn tokenizes_parens_and_skips_spaces() {
        let tokens = tokenize("2 * (3 + 4)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number(2.0),
                Token::Operator(Operator::Mul),
                Token::LParen,
                Token::Number(3.0),
                Token::Operator(Operator::Add),
                Token::Number(4.0),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn rejects_double_decimal_point() {
        assert_eq!(tokenize("2..2+3"), Err(CalcError::InvalidNumber));
    }

    #[test]
    fn rejects_unknown_character() {
        assert_eq!(tokenize("2+a"), Err(CalcError::InvalidCharacter('a')));
    }
}
