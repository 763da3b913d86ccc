//! Parser (C1, part 2): token stream → reverse-Polish notation via the
//! standard shunting-yard algorithm. Operators are left-associative;
//! mismatched parens fail with `BracketMismatch`. Does not evaluate.

use crate::error::{CalcError, Result};
use crate::types::Token;

pub fn to_rpn(tokens: Vec<Token>) -> Result<Vec<Token>> {
    let mut output = Vec::new();
    let mut ops: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(_) => output.push(token),
            Token::Operator(op) => {
                while let Some(Token::Operator(top)) = ops.last() {
                    if top.precedence() >= op.precedence() {
                        output.push(ops.pop().unwrap());
                    } else {
                        break;
                    }
                }
                ops.push(Token::Operator(op));
            }
            Token::LParen => ops.push(token),
            Token::RParen => {
                loop {
                    match ops.pop() {
                        Some(Token::LParen) => break,
                        Some(other) => output.push(other),
                        None => return Err(CalcError::BracketMismatch),
                    }
                }
            }
        }
    }

    while let Some(top) = ops.pop() {
        if matches!(top, Token::LParen) {
            return Err(CalcError::BracketMismatch);
        }
        output.push(top);
    }

    Ok(output)
}
