//! Whitespace and comment stripping for JavaScript-like sources.
//!
//! This is the classic JSMin state machine: it keeps string, template and
//! regular-expression literals intact, drops comments, and removes any
//! whitespace that does not separate two identifier characters. It is a
//! token-reduction pass, not a parser; output is not guaranteed to be
//! valid code for every input.

use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

/// Reasons the minifier gives up on an input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MinifyError {
    #[error("unterminated comment")]
    UnterminatedComment,

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated set in regular expression literal")]
    UnterminatedRegexSet,

    #[error("unterminated regular expression literal")]
    UnterminatedRegex,
}

/// Minify `source`, returning an error if a literal or comment never closes
pub fn minify_js(source: &str) -> Result<String, MinifyError> {
    let mut minifier = JsMinifier::new(source);
    minifier.run()?;
    Ok(minifier.out.trim_matches('\n').to_string())
}

fn is_alphanum(c: Option<char>) -> bool {
    match c {
        Some(c) => c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '\\') || c as u32 > 126,
        None => false,
    }
}

/// Characters after which a `/` starts a regular expression, not a division
fn precedes_regex(c: Option<char>) -> bool {
    matches!(
        c,
        Some(
            '(' | ',' | '=' | ':' | '[' | '!' | '&' | '|' | '?' | '+' | '-' | '~' | '*' | '/'
                | '{' | '}' | ';' | '\n'
        )
    )
}

#[derive(Clone, Copy)]
enum Action {
    /// Emit `a`, then shift `b` into `a` and read the next `b`
    Output,
    /// Drop `a`, shift `b` into `a` and read the next `b`
    Copy,
    /// Drop `b` and read the next one
    Skip,
}

struct JsMinifier<'a> {
    input: Peekable<Chars<'a>>,
    out: String,
    a: Option<char>,
    b: Option<char>,
}

impl<'a> JsMinifier<'a> {
    fn new(source: &'a str) -> Self {
        let mut input = source.chars().peekable();
        if input.peek() == Some(&'\u{feff}') {
            input.next();
        }
        Self {
            input,
            out: String::with_capacity(source.len()),
            a: Some('\n'),
            b: None,
        }
    }

    /// Next input character with line endings normalised and other control
    /// characters turned into spaces
    fn get(&mut self) -> Option<char> {
        self.input.next().map(normalize)
    }

    fn peek(&mut self) -> Option<char> {
        self.input.peek().copied().map(normalize)
    }

    fn emit(&mut self, c: Option<char>) {
        if let Some(c) = c {
            self.out.push(c);
        }
    }

    /// Next character with comments collapsed: a line comment becomes the
    /// newline ending it, a block comment becomes a single space
    fn next(&mut self) -> Result<Option<char>, MinifyError> {
        let c = self.get();
        if c != Some('/') {
            return Ok(c);
        }
        match self.peek() {
            Some('/') => loop {
                match self.get() {
                    Some('\n') | None => return Ok(Some('\n')),
                    Some(_) => {}
                }
            },
            Some('*') => {
                self.get();
                loop {
                    match self.get() {
                        Some('*') if self.peek() == Some('/') => {
                            self.get();
                            return Ok(Some(' '));
                        }
                        Some(_) => {}
                        None => return Err(MinifyError::UnterminatedComment),
                    }
                }
            }
            _ => Ok(c),
        }
    }

    fn action(&mut self, action: Action) -> Result<(), MinifyError> {
        if let Action::Output = action {
            self.emit(self.a);
        }

        if let Action::Output | Action::Copy = action {
            self.a = self.b;
            if let Some(quote @ ('\'' | '"' | '`')) = self.a {
                loop {
                    self.emit(self.a);
                    self.a = self.get();
                    if self.a == Some(quote) {
                        break;
                    }
                    if self.a == Some('\\') {
                        self.emit(self.a);
                        self.a = self.get();
                    }
                    if self.a.is_none() {
                        return Err(MinifyError::UnterminatedString);
                    }
                }
            }
        }

        self.b = self.next()?;
        if self.b == Some('/') && precedes_regex(self.a) {
            self.copy_regex()?;
            self.b = self.next()?;
        }
        Ok(())
    }

    /// Copy a regular expression literal verbatim; `b` holds its opening `/`
    fn copy_regex(&mut self) -> Result<(), MinifyError> {
        self.emit(self.a);
        if matches!(self.a, Some('/' | '*')) {
            self.out.push(' ');
        }
        self.emit(self.b);
        loop {
            self.a = self.get();
            match self.a {
                Some('[') => loop {
                    self.emit(self.a);
                    self.a = self.get();
                    if self.a == Some(']') {
                        break;
                    }
                    if self.a == Some('\\') {
                        self.emit(self.a);
                        self.a = self.get();
                    }
                    if self.a.is_none() {
                        return Err(MinifyError::UnterminatedRegexSet);
                    }
                },
                Some('/') => {
                    if matches!(self.peek(), Some('/' | '*')) {
                        return Err(MinifyError::UnterminatedRegexSet);
                    }
                    break;
                }
                Some('\\') => {
                    self.emit(self.a);
                    self.a = self.get();
                }
                _ => {}
            }
            if self.a.is_none() {
                return Err(MinifyError::UnterminatedRegex);
            }
            self.emit(self.a);
        }
        Ok(())
    }

    fn run(&mut self) -> Result<(), MinifyError> {
        self.action(Action::Skip)?;
        while self.a.is_some() {
            let next = match (self.a, self.b) {
                (Some(' '), b) => {
                    if is_alphanum(b) {
                        Action::Output
                    } else {
                        Action::Copy
                    }
                }
                (Some('\n'), Some('{' | '[' | '(' | '+' | '-' | '!' | '~')) => Action::Output,
                (Some('\n'), Some(' ')) => Action::Skip,
                (Some('\n'), b) => {
                    if is_alphanum(b) {
                        Action::Output
                    } else {
                        Action::Copy
                    }
                }
                (a, Some(' ')) => {
                    if is_alphanum(a) {
                        Action::Output
                    } else {
                        Action::Skip
                    }
                }
                (a @ Some(c), Some('\n')) => {
                    if matches!(c, '}' | ']' | ')' | '+' | '-' | '"' | '\'' | '`') || is_alphanum(a) {
                        Action::Output
                    } else {
                        Action::Skip
                    }
                }
                _ => Action::Output,
            };
            self.action(next)?;
        }
        Ok(())
    }
}

fn normalize(c: char) -> char {
    match c {
        '\r' => '\n',
        '\n' => '\n',
        c if c < ' ' => ' ',
        c => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(minify_js("var  a  =  1 ;").unwrap(), "var a=1;");
    }

    #[test]
    fn test_strips_line_comments() {
        assert_eq!(minify_js("// header\nlet y = 2;\n").unwrap(), "let y=2;");
    }

    #[test]
    fn test_block_comment_becomes_space() {
        assert_eq!(minify_js("a /* note */ b").unwrap(), "a b");
    }

    #[test]
    fn test_keeps_string_contents() {
        let out = minify_js("const s = \"a  //  b\";").unwrap();
        assert_eq!(out, "const s=\"a  //  b\";");
    }

    #[test]
    fn test_keeps_template_literal() {
        let out = minify_js("let t = `x   ${y}`;").unwrap();
        assert!(out.contains("`x   ${y}`"));
    }

    #[test]
    fn test_keeps_regex_literal() {
        let out = minify_js("var r = /a  b\\/c/g;").unwrap();
        assert_eq!(out, "var r=/a  b\\/c/g;");
    }

    #[test]
    fn test_function_body() {
        let src = "function add(a, b) {\n    return a + b;\n}\n";
        assert_eq!(minify_js(src).unwrap(), "function add(a,b){return a+b;}");
    }

    #[test]
    fn test_unterminated_inputs_fail() {
        assert_eq!(minify_js("a /* open"), Err(MinifyError::UnterminatedComment));
        assert_eq!(minify_js("var s = 'open"), Err(MinifyError::UnterminatedString));
    }
}
