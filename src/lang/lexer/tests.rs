// This file is part of ratstack, a concatenative language kernel.
//
// SPDX-License-Identifier: GPL-3.0-or-later
//
// ratstack is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// ratstack is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with ratstack.  If not, see <http://www.gnu.org/licenses/>.

use super::Lexer;
use crate::error::RatError;
use crate::lang::Token;

fn lex(src: &str) -> Vec<Token> {
    Lexer::tokenize(src).expect("lex should succeed")
}

#[test]
fn lexes_simple_arithmetic() {
    assert_eq!(
        lex("2 3 +"),
        vec![
            Token::Number("2".into()),
            Token::Number("3".into()),
            Token::Ident("+".into()),
        ]
    );
}

#[test]
fn lexes_nested_vector_literal() {
    assert_eq!(
        lex("[ 1 [ 2 3 ] ]"),
        vec![
            Token::LBracket,
            Token::Number("1".into()),
            Token::LBracket,
            Token::Number("2".into()),
            Token::Number("3".into()),
            Token::RBracket,
            Token::RBracket,
        ]
    );
}

#[test]
fn brackets_are_separate_tokens_even_when_adjacent() {
    assert_eq!(
        lex("[1]"),
        vec![
            Token::LBracket,
            Token::Number("1".into()),
            Token::RBracket,
        ]
    );
}

#[test]
fn lexes_quoted_string() {
    assert_eq!(lex("\"hello world\""), vec![Token::Str("hello world".into())]);
}

#[test]
fn lexes_quoted_symbol_case_insensitively() {
    assert_eq!(lex("SYM:Foo"), vec![Token::Symbol("Foo".into())]);
}

#[test]
fn line_comment_becomes_a_token() {
    assert_eq!(
        lex("1 # this is a comment\n2"),
        vec![
            Token::Number("1".into()),
            Token::Comment("this is a comment".into(), true),
            Token::Number("2".into()),
        ]
    );
}

#[test]
fn comment_at_end_of_input_with_no_newline() {
    assert_eq!(
        lex("1 # trailing"),
        vec![
            Token::Number("1".into()),
            Token::Comment("trailing".into(), true),
        ]
    );
}

#[test]
fn comment_after_a_newline_is_not_flagged_same_line() {
    assert_eq!(
        lex("DOUBLE\n# note"),
        vec![
            Token::Ident("DOUBLE".into()),
            Token::Comment("note".into(), false),
        ]
    );
}

#[test]
fn comment_separated_by_a_blank_line_is_not_flagged_same_line() {
    assert_eq!(
        lex("DOUBLE\n\n# note"),
        vec![
            Token::Ident("DOUBLE".into()),
            Token::Comment("note".into(), false),
        ]
    );
}

#[test]
fn unterminated_string_is_a_parse_error() {
    let err = Lexer::tokenize("\"abc").unwrap_err();
    assert!(matches!(err, RatError::ParseError(_)));
}

#[test]
fn negative_number_literal() {
    assert_eq!(lex("-5"), vec![Token::Number("-5".into())]);
}

#[test]
fn fraction_literal() {
    assert_eq!(lex("1/2"), vec![Token::Number("1/2".into())]);
}

#[test]
fn def_and_name_tokens_are_plain_identifiers() {
    assert_eq!(
        lex("[ DUP + ] DEF DOUBLE"),
        vec![
            Token::LBracket,
            Token::Ident("DUP".into()),
            Token::Ident("+".into()),
            Token::RBracket,
            Token::Ident("DEF".into()),
            Token::Ident("DOUBLE".into()),
        ]
    );
}

#[test]
fn whitespace_variety_is_all_skipped() {
    assert_eq!(
        lex("1\t2\n3  4"),
        vec![
            Token::Number("1".into()),
            Token::Number("2".into()),
            Token::Number("3".into()),
            Token::Number("4".into()),
        ]
    );
}
