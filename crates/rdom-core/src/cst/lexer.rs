//! CST-aware lexer that preserves all trivia (whitespace, comments)
//!
//! Every byte of the input ends up in exactly one token, so concatenating the
//! token texts reproduces the source. Comments and line breaks are kept as
//! their own tokens because the model turns them into list members.

use crate::cst::CsSyntaxKind;
use std::ops::Range;

/// Simple span representing a range in the source
pub type CstSpan = Range<usize>;

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub span: CstSpan,
}

impl LexerError {
    pub fn new(message: impl Into<String>, span: CstSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A token with its syntax kind and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstToken {
    pub kind: CsSyntaxKind,
    pub text: String,
    pub span: CstSpan,
}

impl CstToken {
    pub fn new(kind: CsSyntaxKind, text: impl Into<String>, span: CstSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Result returned by the CST lexer
pub type CstLexResult = (Vec<CstToken>, Vec<LexerError>);

/// Lex input preserving ALL trivia for CST construction
///
/// - Whitespace runs become `Whitespace` tokens
/// - `//` and `/* */` comments become `CommentLine`/`CommentBlock`
/// - Each line break (`\n`, `\r\n`, `\r`) becomes one `Newline`
/// - `#region`/`#endregion` lines become a single directive token each
///
/// The token stream always ends with an empty `Eof` token.
pub fn lex_with_trivia(input: &str) -> CstLexResult {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    let len = input.len();
    let mut i = 0usize;
    let mut at_line_start = true;

    while i < len {
        let Some((current, size)) = next_char(input, i) else {
            break;
        };
        let start = i;

        match current {
            '\n' => {
                tokens.push(CstToken::new(
                    CsSyntaxKind::Newline,
                    "\n",
                    span(start, i + size),
                ));
                i += size;
                at_line_start = true;
                continue;
            }
            '\r' => {
                // \r\n is a single line break
                let mut end = i + size;
                if let Some(('\n', nl_size)) = next_char(input, end) {
                    end += nl_size;
                }
                tokens.push(CstToken::new(
                    CsSyntaxKind::Newline,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
                at_line_start = true;
                continue;
            }

            c if c.is_whitespace() => {
                let mut end = i + size;
                while let Some((next_ch, next_size)) = next_char(input, end) {
                    if next_ch.is_whitespace() && next_ch != '\n' && next_ch != '\r' {
                        end += next_size;
                    } else {
                        break;
                    }
                }
                tokens.push(CstToken::new(
                    CsSyntaxKind::Whitespace,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
                // Indentation does not end the "start of line" state
                continue;
            }

            '/' => match next_char(input, i + size) {
                Some(('/', _)) => {
                    let end = line_end(input, start);
                    tokens.push(CstToken::new(
                        CsSyntaxKind::CommentLine,
                        &input[start..end],
                        span(start, end),
                    ));
                    i = end;
                }
                Some(('*', star_size)) => {
                    let (end, terminated) = match input[start + size + star_size..].find("*/") {
                        Some(rel) => (start + size + star_size + rel + 2, true),
                        None => (len, false),
                    };
                    if !terminated {
                        errors.push(LexerError::new(
                            "Unterminated block comment",
                            span(start, end),
                        ));
                    }
                    tokens.push(CstToken::new(
                        CsSyntaxKind::CommentBlock,
                        &input[start..end],
                        span(start, end),
                    ));
                    i = end;
                }
                _ => {
                    tokens.push(CstToken::new(
                        CsSyntaxKind::Operator,
                        "/",
                        span(start, i + size),
                    ));
                    i += size;
                }
            },

            '#' => {
                let (word, _) = read_word(input, i + size);
                let directive = match word.as_str() {
                    "region" if at_line_start => Some(CsSyntaxKind::RegionDirective),
                    "endregion" if at_line_start => Some(CsSyntaxKind::EndRegionDirective),
                    _ => None,
                };
                if let Some(kind) = directive {
                    // The directive owns the rest of its line, but not trailing blanks
                    let end = start + input[start..line_end(input, start)].trim_end().len();
                    tokens.push(CstToken::new(kind, &input[start..end], span(start, end)));
                    i = end;
                } else {
                    tokens.push(CstToken::new(
                        CsSyntaxKind::Operator,
                        "#",
                        span(start, i + size),
                    ));
                    i += size;
                }
            }

            '"' => {
                let (end, error) = lex_string(input, start, start + size);
                if let Some(err) = error {
                    errors.push(err);
                }
                tokens.push(CstToken::new(
                    CsSyntaxKind::StringLiteral,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
            }

            '@' => match next_char(input, i + size) {
                Some(('"', quote_size)) => {
                    let (end, error) = lex_verbatim_string(input, start, i + size + quote_size);
                    if let Some(err) = error {
                        errors.push(err);
                    }
                    tokens.push(CstToken::new(
                        CsSyntaxKind::StringLiteral,
                        &input[start..end],
                        span(start, end),
                    ));
                    i = end;
                }
                Some((c, _)) if is_ident_start(c) => {
                    // @class is an identifier, never a keyword
                    let (_, end) = read_word(input, i + size);
                    tokens.push(CstToken::new(
                        CsSyntaxKind::Ident,
                        &input[start..end],
                        span(start, end),
                    ));
                    i = end;
                }
                _ => {
                    errors.push(LexerError::new(
                        "Unexpected character: '@'",
                        span(start, i + size),
                    ));
                    tokens.push(CstToken::new(
                        CsSyntaxKind::Error,
                        "@",
                        span(start, i + size),
                    ));
                    i += size;
                }
            },

            '\'' => {
                let (end, error) = lex_char(input, start);
                if let Some(err) = error {
                    errors.push(err);
                }
                tokens.push(CstToken::new(
                    CsSyntaxKind::CharLiteral,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
            }

            c if c.is_ascii_digit()
                || (c == '.' && input.as_bytes().get(i + 1).is_some_and(u8::is_ascii_digit)) =>
            {
                let (kind, end) = lex_number(input, start);
                tokens.push(CstToken::new(kind, &input[start..end], span(start, end)));
                i = end;
            }

            c if is_ident_start(c) => {
                let (word, end) = read_word(input, start);
                let kind = CsSyntaxKind::from_keyword(&word).unwrap_or(CsSyntaxKind::Ident);
                tokens.push(CstToken::new(kind, word, span(start, end)));
                i = end;
            }

            _ => {
                let kind = match current {
                    '{' => Some(CsSyntaxKind::LBrace),
                    '}' => Some(CsSyntaxKind::RBrace),
                    '(' => Some(CsSyntaxKind::LParen),
                    ')' => Some(CsSyntaxKind::RParen),
                    '[' => Some(CsSyntaxKind::LBracket),
                    ']' => Some(CsSyntaxKind::RBracket),
                    ';' => Some(CsSyntaxKind::Semicolon),
                    ',' => Some(CsSyntaxKind::Comma),
                    '.' => Some(CsSyntaxKind::Dot),
                    ':' => Some(CsSyntaxKind::Colon),
                    '=' => Some(CsSyntaxKind::Equals),
                    '<' => Some(CsSyntaxKind::Lt),
                    '>' => Some(CsSyntaxKind::Gt),
                    '+' | '-' | '*' | '%' | '!' | '?' | '&' | '|' | '^' | '~' => {
                        Some(CsSyntaxKind::Operator)
                    }
                    _ => None,
                };
                match kind {
                    Some(kind) => {
                        tokens.push(CstToken::new(
                            kind,
                            &input[start..i + size],
                            span(start, i + size),
                        ));
                    }
                    None => {
                        errors.push(LexerError::new(
                            format!("Unexpected character: '{current}'"),
                            span(start, i + size),
                        ));
                        tokens.push(CstToken::new(
                            CsSyntaxKind::Error,
                            &input[start..i + size],
                            span(start, i + size),
                        ));
                    }
                }
                i += size;
            }
        }

        at_line_start = false;
    }

    tokens.push(CstToken::new(CsSyntaxKind::Eof, "", span(len, len)));

    (tokens, errors)
}

/// Lex a regular string literal; `body` is the offset just past the quote
fn lex_string(input: &str, start: usize, body: usize) -> (usize, Option<LexerError>) {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut i = body;

    while i < len {
        match bytes[i] {
            b'"' => return (i + 1, None),
            b'\\' => i += 2,
            b'\n' | b'\r' => break,
            _ => i += 1,
        }
    }

    let end = i.min(len);
    (
        end,
        Some(LexerError::new("Unterminated string", span(start, end))),
    )
}

/// Lex a verbatim string literal (`@"..."`, quotes doubled inside)
fn lex_verbatim_string(input: &str, start: usize, body: usize) -> (usize, Option<LexerError>) {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut i = body;

    while i < len {
        if bytes[i] == b'"' {
            if i + 1 < len && bytes[i + 1] == b'"' {
                i += 2;
                continue;
            }
            return (i + 1, None);
        }
        i += 1;
    }

    (
        len,
        Some(LexerError::new(
            "Unterminated verbatim string",
            span(start, len),
        )),
    )
}

/// Lex a character literal
fn lex_char(input: &str, start: usize) -> (usize, Option<LexerError>) {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut i = start + 1;

    while i < len {
        match bytes[i] {
            b'\'' => return (i + 1, None),
            b'\\' => i += 2,
            b'\n' | b'\r' => break,
            _ => i += 1,
        }
    }

    let end = i.min(len);
    (
        end,
        Some(LexerError::new(
            "Unterminated character literal",
            span(start, end),
        )),
    )
}

/// Lex an integer or real literal including its type suffix
fn lex_number(input: &str, start: usize) -> (CsSyntaxKind, usize) {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut i = start;

    // Hexadecimal: 0x1F, 0xFFu
    if i + 1 < len && bytes[i] == b'0' && (bytes[i + 1] == b'x' || bytes[i + 1] == b'X') {
        i += 2;
        while i < len && (bytes[i].is_ascii_hexdigit() || bytes[i] == b'_') {
            i += 1;
        }
        return (CsSyntaxKind::IntegerLiteral, lex_integer_suffix(bytes, i));
    }

    let mut is_real = false;
    while i < len && (bytes[i].is_ascii_digit() || bytes[i] == b'_') {
        i += 1;
    }

    // Fraction needs a digit after the dot, so `1.ToString()` stays an integer
    if i + 1 < len && bytes[i] == b'.' && bytes[i + 1].is_ascii_digit() {
        is_real = true;
        i += 1;
        while i < len && (bytes[i].is_ascii_digit() || bytes[i] == b'_') {
            i += 1;
        }
    }

    if i < len && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < len && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < len && bytes[j].is_ascii_digit() {
            is_real = true;
            i = j;
            while i < len && bytes[i].is_ascii_digit() {
                i += 1;
            }
        }
    }

    if i < len && matches!(bytes[i], b'f' | b'F' | b'd' | b'D' | b'm' | b'M') {
        return (CsSyntaxKind::RealLiteral, i + 1);
    }

    if is_real {
        (CsSyntaxKind::RealLiteral, i)
    } else {
        (CsSyntaxKind::IntegerLiteral, lex_integer_suffix(bytes, i))
    }
}

/// Consume `u`, `l`, `ul` or `lu` in any case
fn lex_integer_suffix(bytes: &[u8], mut i: usize) -> usize {
    let len = bytes.len();
    let mut seen_u = false;
    let mut seen_l = false;
    while i < len {
        match bytes[i] {
            b'u' | b'U' if !seen_u => seen_u = true,
            b'l' | b'L' if !seen_l => seen_l = true,
            _ => break,
        }
        i += 1;
    }
    i
}

fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

/// Read a word (sequence of alphanumeric/underscore chars)
fn read_word(input: &str, start: usize) -> (String, usize) {
    let mut end = start;
    for (offset, ch) in input[start..].char_indices() {
        if ch == '_' || ch.is_alphanumeric() {
            end = start + offset + ch.len_utf8();
        } else {
            break;
        }
    }

    (input[start..end].to_string(), end)
}

/// Offset of the next line break at or after `start`, or the input length
fn line_end(input: &str, start: usize) -> usize {
    input[start..]
        .find(['\n', '\r'])
        .map(|rel| start + rel)
        .unwrap_or(input.len())
}

/// Get next character and its UTF-8 size
fn next_char(input: &str, pos: usize) -> Option<(char, usize)> {
    input[pos..].chars().next().map(|c| (c, c.len_utf8()))
}

/// Create a span from start to end
fn span(start: usize, end: usize) -> CstSpan {
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<CsSyntaxKind> {
        lex_with_trivia(input).0.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_preserves_whitespace() {
        let input = "int  x;";
        let (tokens, errors) = lex_with_trivia(input);
        assert!(errors.is_empty());

        // PREDEFINED_TYPE_KW, WHITESPACE (2 spaces), IDENT, SEMICOLON, EOF
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0].kind, CsSyntaxKind::PredefinedTypeKw);
        assert_eq!(tokens[1].kind, CsSyntaxKind::Whitespace);
        assert_eq!(tokens[1].text, "  ");
        assert_eq!(tokens[2].kind, CsSyntaxKind::Ident);
        assert_eq!(tokens[3].kind, CsSyntaxKind::Semicolon);
        assert_eq!(tokens[4].kind, CsSyntaxKind::Eof);
    }

    #[test]
    fn test_lossless_reconstruction() {
        let input = "// header\r\nclass C /* note */\n{\n    #region Fields  \n    int x = 0x1Fu;\n    #endregion\n}\n";
        let (tokens, errors) = lex_with_trivia(input);
        assert!(errors.is_empty());

        let reconstructed: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(reconstructed, input);
    }

    #[test]
    fn test_crlf_is_one_newline() {
        let (tokens, _) = lex_with_trivia("a\r\nb");
        assert_eq!(tokens[1].kind, CsSyntaxKind::Newline);
        assert_eq!(tokens[1].text, "\r\n");
        assert_eq!(tokens[2].kind, CsSyntaxKind::Ident);
    }

    #[test]
    fn test_comments() {
        let (tokens, _) = lex_with_trivia("// line\n/* block\ncomment */");
        assert_eq!(tokens[0].kind, CsSyntaxKind::CommentLine);
        assert_eq!(tokens[0].text, "// line");
        assert_eq!(tokens[1].kind, CsSyntaxKind::Newline);
        assert_eq!(tokens[2].kind, CsSyntaxKind::CommentBlock);
        assert_eq!(tokens[2].text, "/* block\ncomment */");
    }

    #[test]
    fn test_unterminated_block_comment() {
        let (tokens, errors) = lex_with_trivia("/* open");
        assert_eq!(errors.len(), 1);
        assert_eq!(tokens[0].kind, CsSyntaxKind::CommentBlock);
        assert_eq!(tokens[0].text, "/* open");
    }

    #[test]
    fn test_region_directives() {
        let (tokens, errors) = lex_with_trivia("    #region Public API   \n#endregion");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, CsSyntaxKind::Whitespace);
        assert_eq!(tokens[1].kind, CsSyntaxKind::RegionDirective);
        assert_eq!(tokens[1].text, "#region Public API");
        assert_eq!(tokens[2].kind, CsSyntaxKind::Whitespace);
        assert_eq!(tokens[3].kind, CsSyntaxKind::Newline);
        assert_eq!(tokens[4].kind, CsSyntaxKind::EndRegionDirective);
    }

    #[test]
    fn test_hash_mid_line_is_not_a_directive() {
        assert_eq!(
            kinds("x #region"),
            vec![
                CsSyntaxKind::Ident,
                CsSyntaxKind::Whitespace,
                CsSyntaxKind::Operator,
                CsSyntaxKind::Ident,
                CsSyntaxKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numeric_literals() {
        let cases = [
            ("42", CsSyntaxKind::IntegerLiteral),
            ("42u", CsSyntaxKind::IntegerLiteral),
            ("42UL", CsSyntaxKind::IntegerLiteral),
            ("0xFF", CsSyntaxKind::IntegerLiteral),
            ("1.5", CsSyntaxKind::RealLiteral),
            ("1.5f", CsSyntaxKind::RealLiteral),
            ("2d", CsSyntaxKind::RealLiteral),
            ("1e10", CsSyntaxKind::RealLiteral),
            ("9.99m", CsSyntaxKind::RealLiteral),
            (".5", CsSyntaxKind::RealLiteral),
            (".5e-3f", CsSyntaxKind::RealLiteral),
            ("1e5m", CsSyntaxKind::RealLiteral),
        ];
        for (input, expected) in cases {
            let (tokens, errors) = lex_with_trivia(input);
            assert!(errors.is_empty(), "{input}");
            assert_eq!(tokens[0].kind, expected, "{input}");
            assert_eq!(tokens[0].text, input);
        }
    }

    #[test]
    fn test_string_and_char_literals() {
        let (tokens, errors) = lex_with_trivia(r#""a \"b\"" @"c ""d""" '\n' @class"#);
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, CsSyntaxKind::StringLiteral);
        assert_eq!(tokens[0].text, r#""a \"b\"""#);
        assert_eq!(tokens[2].kind, CsSyntaxKind::StringLiteral);
        assert_eq!(tokens[2].text, r#"@"c ""d""""#);
        assert_eq!(tokens[4].kind, CsSyntaxKind::CharLiteral);
        assert_eq!(tokens[6].kind, CsSyntaxKind::Ident);
        assert_eq!(tokens[6].text, "@class");
    }

    #[test]
    fn test_unterminated_string_stops_at_line_end() {
        let (tokens, errors) = lex_with_trivia("\"open\nnext");
        assert_eq!(errors.len(), 1);
        assert_eq!(tokens[0].text, "\"open");
        assert_eq!(tokens[1].kind, CsSyntaxKind::Newline);
    }

    #[test]
    fn test_unexpected_character() {
        let (tokens, errors) = lex_with_trivia("a $ b");
        assert_eq!(errors.len(), 1);
        assert_eq!(tokens[2].kind, CsSyntaxKind::Error);
        assert_eq!(tokens[2].text, "$");
    }
}
