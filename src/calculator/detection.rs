//! Expression detection for the console prompt.
//!
//! Decides whether text typed at the menu prompt should be evaluated directly
//! instead of being read as a menu choice, command or operation name. Uses the
//! evaluator's own tokenizer, so anything accepted here at least lexes.

use super::catalog;
use super::lexer::{Token, tokenize};

/// Check if input looks like a calculator expression.
///
/// True when the input tokenizes and contains a binary operator, a call or a
/// parenthesized group. Plain numbers (signed or not), bare names and the
/// name or label of a catalog operation are not expressions.
pub fn looks_like_expression(input: &str) -> bool {
    let trimmed = input.trim();
    if trimmed.is_empty() || catalog::by_name(trimmed).is_some() {
        return false;
    }

    let Ok(tokens) = tokenize(trimmed) else {
        return false;
    };

    let mut prev: Option<&Token> = None;
    for token in &tokens {
        let found = match token {
            Token::LParen => true,
            _ if is_operator(token) => prev.is_some_and(is_operand_end),
            _ => false,
        };
        if found {
            return true;
        }
        prev = Some(token);
    }
    false
}

fn is_operator(token: &Token) -> bool {
    matches!(
        token,
        Token::Plus
            | Token::Minus
            | Token::Star
            | Token::Power
            | Token::Slash
            | Token::FloorSlash
            | Token::Percent
    )
}

/// Tokens after which an operator is binary rather than a sign.
fn is_operand_end(token: &Token) -> bool {
    matches!(token, Token::Number(_) | Token::Ident(_) | Token::RParen)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers_rejected() {
        assert!(!looks_like_expression("12"));
        assert!(!looks_like_expression("32"));
        assert!(!looks_like_expression("42.5"));
        assert!(!looks_like_expression("-123"));
        assert!(!looks_like_expression("+7"));
        assert!(!looks_like_expression("  31  "));
        assert!(!looks_like_expression("1,000"));
        assert!(!looks_like_expression("1e3"));
    }

    #[test]
    fn test_expressions_accepted() {
        assert!(looks_like_expression("2+2"));
        assert!(looks_like_expression("10 * 5"));
        assert!(looks_like_expression("2^8"));
        assert!(looks_like_expression("2**8"));
        assert!(looks_like_expression("7 // 2"));
        assert!(looks_like_expression("7 % 2"));
        assert!(looks_like_expression("(2 + 3) * 4"));
        assert!(looks_like_expression("10 - 5"));
        assert!(looks_like_expression("10 - -5"));
        assert!(looks_like_expression("M * 3"));
        assert!(looks_like_expression("(-5)"));
    }

    #[test]
    fn test_functions_accepted() {
        assert!(looks_like_expression("sin(30)"));
        assert!(looks_like_expression("sqrt (16)"));
        assert!(looks_like_expression("log(8, 2)"));
        assert!(looks_like_expression("factorial(5)"));
    }

    #[test]
    fn test_menu_commands_and_names_rejected() {
        assert!(!looks_like_expression(""));
        assert!(!looks_like_expression("h"));
        assert!(!looks_like_expression("m"));
        assert!(!looks_like_expression("M"));
        assert!(!looks_like_expression("gcd"));
        assert!(!looks_like_expression("log base"));
        assert!(!looks_like_expression("10^x"));
        assert!(!looks_like_expression("Floor divide (x // y)"));
        assert!(!looks_like_expression("hello world"));
        assert!(!looks_like_expression("sqrt 16"));
    }

    #[test]
    fn test_text_outside_the_grammar_rejected() {
        assert!(!looks_like_expression("__import__('os')"));
        assert!(!looks_like_expression("2 + 2;"));
        assert!(!looks_like_expression("1.2.3 + 1"));
    }
}
