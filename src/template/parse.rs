//! Lexer and parser for template text.
//!
//! ```text
//! template := (text | "{{" pipeline "}}")*
//! pipeline := command ("|" command)*
//! command  := identifier arg*
//! arg      := "." | "\"" escaped "\"" | "`" raw "`"
//! ```

use crate::error::{Error, Result};

/// Unbound syntax tree node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Text(String),
    Action(Vec<Command>),
}

/// One stage of a pipeline, before its name is resolved.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Command {
    pub(crate) name: String,
    pub(crate) args: Vec<Arg>,
    pub(crate) offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Arg {
    Dot,
    Str(String),
}

#[derive(Debug, PartialEq)]
enum Token {
    Ident(String),
    Dot,
    Str(String),
    Pipe,
    Close,
}

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn next_token(&mut self) -> Result<(usize, Token)> {
        self.skip_whitespace();
        let start = self.pos;
        if self.rest().starts_with(CLOSE) {
            self.pos += CLOSE.len();
            return Ok((start, Token::Close));
        }
        let c = self
            .bump()
            .ok_or_else(|| Error::configuration(start, "unclosed action"))?;
        let token = match c {
            '.' => {
                if matches!(self.peek(), Some(n) if n.is_alphanumeric() || n == '_') {
                    return Err(Error::configuration(start, "field access is not supported"));
                }
                Token::Dot
            }
            '|' => Token::Pipe,
            '"' => Token::Str(self.quoted(start)?),
            '`' => Token::Str(self.raw(start)?),
            c if c.is_alphabetic() || c == '_' => {
                while matches!(self.peek(), Some(n) if n.is_alphanumeric() || n == '_') {
                    self.bump();
                }
                Token::Ident(self.src[start..self.pos].to_string())
            }
            other => {
                return Err(Error::configuration(
                    start,
                    format!("unexpected {other:?} in action"),
                ))
            }
        };
        Ok((start, token))
    }

    fn quoted(&mut self, start: usize) -> Result<String> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(Error::configuration(start, "unterminated quoted string"))
                }
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(c @ ('\\' | '"')) => out.push(c),
                    Some(c) => {
                        return Err(Error::configuration(
                            self.pos - c.len_utf8() - 1,
                            format!("unknown escape sequence \\{c}"),
                        ))
                    }
                    None => {
                        return Err(Error::configuration(start, "unterminated quoted string"))
                    }
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn raw(&mut self, start: usize) -> Result<String> {
        let body_start = self.pos;
        match self.rest().find('`') {
            Some(len) => {
                self.pos += len + 1;
                Ok(self.src[body_start..body_start + len].to_string())
            }
            None => Err(Error::configuration(start, "unterminated raw string")),
        }
    }
}

fn push_arg(current: &mut Option<Command>, offset: usize, arg: Arg) -> Result<()> {
    let command = current
        .as_mut()
        .ok_or_else(|| Error::configuration(offset, "command must start with a name"))?;
    command.args.push(arg);
    Ok(())
}

fn parse_action(lexer: &mut Lexer<'_>, open_at: usize) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    let mut current: Option<Command> = None;
    loop {
        let (offset, token) = lexer.next_token()?;
        match token {
            Token::Ident(name) => {
                if current.is_some() {
                    return Err(Error::configuration(
                        offset,
                        format!("unexpected identifier {name:?} in argument list"),
                    ));
                }
                current = Some(Command {
                    name,
                    args: Vec::new(),
                    offset,
                });
            }
            Token::Dot => push_arg(&mut current, offset, Arg::Dot)?,
            Token::Str(s) => push_arg(&mut current, offset, Arg::Str(s))?,
            Token::Pipe => {
                let command = current
                    .take()
                    .ok_or_else(|| Error::configuration(offset, "missing command before |"))?;
                commands.push(command);
            }
            Token::Close => {
                match current.take() {
                    Some(command) => commands.push(command),
                    None if commands.is_empty() => {
                        return Err(Error::configuration(open_at, "empty action"))
                    }
                    None => return Err(Error::configuration(offset, "missing command after |")),
                }
                return Ok(commands);
            }
        }
    }
}

/// Parse template source into text and action nodes.
pub(crate) fn parse(src: &str) -> Result<Vec<Node>> {
    let mut nodes = Vec::new();
    let mut lexer = Lexer { src, pos: 0 };
    while lexer.pos < src.len() {
        let rest = lexer.rest();
        let Some(open) = rest.find(OPEN) else {
            nodes.push(Node::Text(rest.to_string()));
            break;
        };
        if open > 0 {
            nodes.push(Node::Text(rest[..open].to_string()));
        }
        let open_at = lexer.pos + open;
        lexer.pos = open_at + OPEN.len();
        nodes.push(Node::Action(parse_action(&mut lexer, open_at)?));
    }
    Ok(nodes)
}
