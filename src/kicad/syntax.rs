use crate::errors::SyntaxError;
use itertools::Itertools;
use std::collections::VecDeque;

#[derive(Debug, PartialEq)]
pub enum Token {
    OpenParen(usize),
    CloseParen(usize),
    Identifier(usize, String),
    QuotedString(usize, String),
    Number(usize, f64),
}

impl Token {
    pub fn is_closing_paren(&self) -> bool {
        matches!(self, Token::CloseParen(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxItem {
    pub name: String,
    pub arguments: Vec<SyntaxArgument>,
    pub children: Vec<SyntaxItem>,
}

impl SyntaxItem {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn from_single_argument(name: &str, argument: SyntaxArgument) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            arguments: vec![argument],
        }
    }

    pub fn from_single_child(name: &str, child: SyntaxItem) -> Self {
        Self {
            name: name.into(),
            children: vec![child],
            arguments: Vec::new(),
        }
    }

    pub fn from_arguments(name: &str, arguments: Vec<SyntaxArgument>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            arguments,
        }
    }

    /// `(name x y)` for a coordinate pair.
    pub fn xy(name: &str, x: f64, y: f64) -> Self {
        Self::from_arguments(name, vec![SyntaxArgument::number(x), SyntaxArgument::number(y)])
    }

    pub fn with_argument(mut self, argument: SyntaxArgument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn with_child(mut self, child: SyntaxItem) -> Self {
        self.children.push(child);
        self
    }

    pub fn get_named_child(&self, name: &str) -> Option<&SyntaxItem> {
        self.children.iter().find(|item| item.name == name)
    }

    pub fn has_argument(&self, argument: &SyntaxArgument) -> bool {
        self.arguments.iter().any(|a| a.get_string() == argument.get_string())
    }

    /// Single-line rendering, the form used for render list fragments.
    pub fn to_inline_string(&self) -> String {
        KiCadParser::join_tokens(&KiCadParser::generate_tokens(self))
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Copy)]
pub enum PositionPreference {
    Start,
    None,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxArgument {
    Number(f64, PositionPreference),
    Identifier(String, PositionPreference),
    QuotedString(String, PositionPreference),
}

impl SyntaxArgument {
    pub fn number(value: f64) -> Self {
        SyntaxArgument::Number(value, PositionPreference::None)
    }

    pub fn identifier(value: &str) -> Self {
        SyntaxArgument::Identifier(value.into(), PositionPreference::None)
    }

    pub fn quoted(value: &str) -> Self {
        SyntaxArgument::QuotedString(value.into(), PositionPreference::None)
    }

    /// Identifier when the value survives unquoted, quoted string otherwise.
    pub fn text(value: &str) -> Self {
        if value.is_empty() || !value.chars().all(KiCadParser::is_char_identifier_or_numeric) {
            Self::quoted(value)
        } else {
            Self::identifier(value)
        }
    }

    pub fn get_number(&self) -> Option<f64> {
        if let SyntaxArgument::Number(n, _) = self {
            Some(*n)
        } else {
            None
        }
    }

    pub fn get_string(&self) -> String {
        match self {
            SyntaxArgument::Identifier(str, _) => str.clone(),
            SyntaxArgument::QuotedString(str, _) => str.clone(),
            SyntaxArgument::Number(num, _) => format_number(*num),
        }
    }

    fn to_token(&self) -> Token {
        match self {
            SyntaxArgument::QuotedString(str, _) => Token::QuotedString(0, str.clone()),
            SyntaxArgument::Identifier(str, _) => Token::Identifier(0, str.clone()),
            SyntaxArgument::Number(val, _) => Token::Number(0, *val),
        }
    }

    /// File form of a lone argument, quoted and escaped the way it appears inside an item.
    pub fn to_inline_string(&self) -> String {
        KiCadParser::join_tokens(&[self.to_token()])
    }

    fn preference(&self) -> PositionPreference {
        match self {
            SyntaxArgument::Number(_, p) | SyntaxArgument::Identifier(_, p) | SyntaxArgument::QuotedString(_, p) => *p,
        }
    }
}

/// Shortest decimal form with at most six fractional digits; never prints `-0`.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 1e6).round() / 1e6;
    if rounded == 0.0 {
        return "0".into();
    }
    let text = format!("{:.6}", rounded);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}

pub struct KiCadParser;

impl KiCadParser {
    pub fn tokenize(input: &str) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        let mut chars = input.chars().peekable();
        let mut position: usize = 0;

        while let Some(&ch) = chars.peek() {
            match ch {
                '\r' | '\n' | ' ' | '\t' => {
                    chars.next();
                    position += 1;
                    continue;
                }
                '(' => {
                    tokens.push(Token::OpenParen(position));
                    chars.next();
                    position += 1;
                }
                ')' => {
                    tokens.push(Token::CloseParen(position));
                    chars.next();
                    position += 1;
                }
                '"' => {
                    chars.next(); // Skip opening quote
                    position += 1;
                    let mut string = String::new();
                    while let Some(ch) = chars.next() {
                        position += 1;
                        match ch {
                            '"' => break,
                            '\\' => {
                                if let Some(escaped) = chars.next() {
                                    position += 1;
                                    string.push(escaped);
                                }
                            }
                            _ => string.push(ch),
                        }
                    }
                    tokens.push(Token::QuotedString(position, string));
                }
                _ if Self::is_char_identifier_or_numeric(ch) => {
                    let mut string = String::new();
                    while let Some(ch) = chars.peek() {
                        if Self::is_char_identifier_or_numeric(*ch) {
                            string.push(*ch);
                            chars.next();
                            position += 1;
                        } else if matches!(*ch, ' ' | ')' | '(' | '\r' | '\n' | '\t') {
                            break;
                        } else {
                            return Err(SyntaxError::InvalidIdentifier(position));
                        }
                    }
                    if let Ok(number) = string.parse::<f64>() {
                        tokens.push(Token::Number(position, number));
                    } else {
                        tokens.push(Token::Identifier(position, string));
                    }
                }
                _ => {
                    chars.next();
                    position += 1;
                }
            }
        }

        Ok(tokens)
    }

    pub fn parse_syntax_item(tokens: &[Token]) -> Result<SyntaxItem, SyntaxError> {
        let mut items = VecDeque::<SyntaxItem>::new();
        let mut completed = None;

        for token in tokens {
            match token {
                Token::OpenParen(_) => {
                    items.push_front(SyntaxItem::new(""));
                }
                Token::CloseParen(offset) => {
                    let current_element = items.pop_front().ok_or(SyntaxError::Unbalanced(*offset))?;
                    if let Some(parent_element) = items.front_mut() {
                        parent_element.children.push(current_element);
                    } else {
                        completed = Some(current_element);
                    }
                }
                Token::Identifier(offset, str) => {
                    let top_item = items.front_mut().ok_or(SyntaxError::OrphanValue(*offset))?;
                    if top_item.name.is_empty() {
                        top_item.name = str.clone();
                    } else {
                        top_item.arguments.push(SyntaxArgument::identifier(str));
                    }
                }
                Token::QuotedString(offset, str) => {
                    let top_item = items.front_mut().ok_or(SyntaxError::OrphanValue(*offset))?;
                    top_item.arguments.push(SyntaxArgument::quoted(str));
                }
                Token::Number(offset, val) => {
                    let top_item = items.front_mut().ok_or(SyntaxError::OrphanValue(*offset))?;
                    top_item.arguments.push(SyntaxArgument::number(*val));
                }
            }
        }

        if !items.is_empty() {
            return Err(SyntaxError::Unbalanced(tokens.len()));
        }
        completed.ok_or(SyntaxError::Empty)
    }

    pub fn generate_tokens(item: &SyntaxItem) -> Vec<Token> {
        let mut tokens = vec![Token::OpenParen(0), Token::Identifier(0, item.name.clone())];

        let mut content_tokens: Vec<(Token, PositionPreference)> = Vec::new();

        for argument in &item.arguments {
            content_tokens.push((argument.to_token(), argument.preference()));
        }

        for child in &item.children {
            for token in Self::generate_tokens(child) {
                content_tokens.push((token, PositionPreference::None));
            }
        }

        // stable: equal preferences keep their insertion order
        content_tokens.sort_by(|a, b| a.1.cmp(&b.1));
        tokens.extend(content_tokens.into_iter().map(|(tok, _)| tok));

        tokens.push(Token::CloseParen(0));
        tokens
    }

    /// Joins tokens on one line, separating atoms with single spaces.
    pub fn join_tokens(tokens: &[Token]) -> String {
        let mut string = String::new();
        let mut tokens = tokens.iter().peekable();

        while let Some(token) = tokens.next() {
            match token {
                Token::OpenParen(_) => {
                    string.push('(');
                    continue;
                }
                Token::CloseParen(_) => string.push(')'),
                Token::QuotedString(_, str) => {
                    string.push('"');
                    string.push_str(&str.replace('\\', "\\\\").replace('"', "\\\""));
                    string.push('"');
                }
                Token::Identifier(_, str) => string.push_str(str),
                Token::Number(_, val) => string.push_str(&format_number(*val)),
            }
            if tokens.peek().is_some_and(|&t| !t.is_closing_paren()) {
                string.push(' ');
            }
        }

        string
    }

    pub fn is_char_identifier_or_numeric(ch: char) -> bool {
        ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.' | '*' | '%' | '+' | '$' | '{' | '}' | '/' | ':')
    }
}

/// Names of the top level items of a parsed document, in order.
pub fn child_names(item: &SyntaxItem) -> Vec<&str> {
    item.children.iter().map(|c| c.name.as_str()).collect_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_printed_without_float_noise() {
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(-0.0000001), "0");
        assert_eq!(format_number(-1.27), "-1.27");
    }

    #[test]
    fn inline_string_orders_arguments_by_preference() {
        let item = SyntaxItem::new("fp_text")
            .with_argument(SyntaxArgument::Identifier("hide".into(), PositionPreference::End))
            .with_argument(SyntaxArgument::identifier("reference"))
            .with_argument(SyntaxArgument::text("REF**"))
            .with_child(SyntaxItem::xy("at", 0.0, -1.5));
        assert_eq!(item.to_inline_string(), "(fp_text reference REF** (at 0 -1.5) hide)");
    }

    #[test]
    fn text_arguments_are_quoted_when_needed() {
        assert_eq!(SyntaxArgument::text(""), SyntaxArgument::quoted(""));
        assert_eq!(SyntaxArgument::text("A 1"), SyntaxArgument::quoted("A 1"));
        assert_eq!(SyntaxArgument::text("A1"), SyntaxArgument::identifier("A1"));
    }

    #[test]
    fn inline_string_parses_back() -> anyhow::Result<()> {
        let item = SyntaxItem::new("pad")
            .with_argument(SyntaxArgument::text("1"))
            .with_argument(SyntaxArgument::identifier("smd"))
            .with_child(SyntaxItem::xy("size", 1.5, 0.7))
            .with_child(SyntaxItem::from_single_argument("descr", SyntaxArgument::quoted("say \"hi\"")));
        let tokens = KiCadParser::tokenize(&item.to_inline_string())?;
        let parsed = KiCadParser::parse_syntax_item(&tokens)?;
        assert_eq!(parsed.name, "pad");
        assert_eq!(child_names(&parsed), vec!["size", "descr"]);
        let descr = parsed.get_named_child("descr").map(|d| d.arguments[0].get_string());
        assert_eq!(descr.as_deref(), Some("say \"hi\""));
        Ok(())
    }

    #[test]
    fn unbalanced_documents_are_rejected() -> anyhow::Result<()> {
        let tokens = KiCadParser::tokenize("(module a (layer F.Cu)")?;
        assert!(KiCadParser::parse_syntax_item(&tokens).is_err());
        let tokens = KiCadParser::tokenize("(a))")?;
        assert!(matches!(KiCadParser::parse_syntax_item(&tokens), Err(SyntaxError::Unbalanced(_))));
        Ok(())
    }
}
