use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::tokenizer::{tokenize, Token};

/// Parser for Weave component files.
///
/// Source is scanned in code mode, where everything is preserved verbatim,
/// until a `<` in expression position opens a markup region. Markup regions
/// are parsed into trees; the text between them stays byte-for-byte intact
/// so regeneration of an unmutated document reproduces the original file.
pub struct Parser<'src> {
    source: &'src str,
    pos: usize,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn is_attr_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$' || c == ':'
}

/// Track `function Name` and `const Name =` words so markup blocks can be
/// attributed to the component that renders them.
fn flush_word(
    word: &mut String,
    prev_word: &mut String,
    pending_assign: &mut Option<String>,
    component: &mut Option<String>,
) {
    if word.is_empty() {
        return;
    }
    if prev_word == "function" {
        *component = Some(word.clone());
    }
    if matches!(prev_word.as_str(), "const" | "let" | "var") {
        *pending_assign = Some(word.clone());
    }
    *prev_word = std::mem::take(word);
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self { source, pos: 0 }
    }

    /// Parse a complete source file
    pub fn parse_document(&mut self) -> ParseResult<Document> {
        let segments = self.parse_segments()?;
        Ok(Document {
            source: self.source.to_string(),
            segments,
        })
    }

    fn parse_segments(&mut self) -> ParseResult<Vec<Segment>> {
        let mut segments = Vec::new();
        let mut code_start = 0usize;
        let mut last_sig: Option<char> = None;
        let mut prev_word = String::new();
        let mut word = String::new();
        let mut pending_assign: Option<String> = None;
        let mut component: Option<String> = None;

        while let Some(ch) = self.peek() {
            if ch == '/' && self.starts_with("//") {
                self.skip_line_comment();
                continue;
            }
            if ch == '/' && self.starts_with("/*") {
                self.skip_block_comment();
                continue;
            }
            if ch == '"' || ch == '\'' {
                flush_word(&mut word, &mut prev_word, &mut pending_assign, &mut component);
                self.skip_string(ch);
                last_sig = Some(ch);
                continue;
            }
            if ch == '`' {
                flush_word(&mut word, &mut prev_word, &mut pending_assign, &mut component);
                self.skip_template_string()?;
                last_sig = Some('`');
                continue;
            }
            if ch == '<' {
                flush_word(&mut word, &mut prev_word, &mut pending_assign, &mut component);
                if self.markup_starts_here(last_sig, &prev_word) {
                    if code_start < self.pos {
                        segments.push(Segment::Code {
                            text: self.source[code_start..self.pos].to_string(),
                        });
                    }
                    let start = self.pos;
                    let root = self.parse_node()?;
                    segments.push(Segment::Markup(MarkupBlock {
                        component: component.clone(),
                        root,
                        span: Span::new(start, self.pos),
                    }));
                    code_start = self.pos;
                    // the region reads as a value; a following '<' is comparison
                    last_sig = Some(')');
                    prev_word.clear();
                    continue;
                }
                last_sig = Some('<');
                self.bump();
                continue;
            }
            if is_ident_char(ch) {
                word.push(ch);
                last_sig = Some(ch);
                self.bump();
                continue;
            }
            flush_word(&mut word, &mut prev_word, &mut pending_assign, &mut component);
            if ch == '=' {
                if let Some(name) = pending_assign.take() {
                    component = Some(name);
                }
            }
            if !ch.is_whitespace() {
                last_sig = Some(ch);
            }
            self.bump();
        }

        if code_start < self.pos {
            segments.push(Segment::Code {
                text: self.source[code_start..self.pos].to_string(),
            });
        }

        Ok(segments)
    }

    /// Decide whether a `<` at the current position opens markup rather
    /// than a comparison or generic parameter list.
    fn markup_starts_here(&self, last_sig: Option<char>, prev_word: &str) -> bool {
        let mut chars = self.source[self.pos..].chars();
        chars.next(); // the '<'
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' || c == '>' => {}
            _ => return false,
        }

        if matches!(
            prev_word,
            "return" | "default" | "yield" | "do" | "else" | "case" | "typeof" | "await"
        ) {
            return true;
        }

        match last_sig {
            None => true,
            Some('>') => self.source[..self.pos].trim_end().ends_with("=>"),
            Some(c) if is_ident_char(c) || matches!(c, ')' | ']' | '"' | '\'' | '`') => false,
            Some(_) => true,
        }
    }

    /// Parse a single element or fragment starting at `<`
    fn parse_node(&mut self) -> ParseResult<Node> {
        let start = self.pos;
        self.expect_char('<')?;

        if self.peek() == Some('>') {
            self.bump();
            let children = self.parse_children(None)?;
            return Ok(Node::Fragment(Fragment {
                children,
                span: Span::new(start, self.pos),
            }));
        }

        let tag_name = self.parse_tag_name()?;
        let mut attributes = Vec::new();

        loop {
            self.skip_tag_ws();
            match self.peek() {
                Some('/') => {
                    self.bump();
                    self.expect_char('>')?;
                    return Ok(Node::Element(Element {
                        tag_name,
                        attributes,
                        children: Vec::new(),
                        self_closing: true,
                        span: Span::new(start, self.pos),
                    }));
                }
                Some('>') => {
                    self.bump();
                    break;
                }
                Some(c) if is_attr_name_start(c) => {
                    attributes.push(self.parse_attribute()?);
                }
                Some(c) => {
                    return Err(ParseError::unexpected_char(
                        self.source,
                        self.pos,
                        c,
                        "attribute name, '>', or '/>'",
                    ));
                }
                None => return Err(ParseError::unexpected_eof(self.source, self.pos)),
            }
        }

        let children = self.parse_children(Some(&tag_name))?;
        Ok(Node::Element(Element {
            tag_name,
            attributes,
            children,
            self_closing: false,
            span: Span::new(start, self.pos),
        }))
    }

    /// Parse children until the matching closing tag. `open_tag` is `None`
    /// inside a fragment, which closes with `</>`.
    fn parse_children(&mut self, open_tag: Option<&str>) -> ParseResult<Vec<Node>> {
        let mut children = Vec::new();

        loop {
            match self.peek() {
                None => return Err(ParseError::unexpected_eof(self.source, self.pos)),
                Some('<') if self.starts_with("</") => {
                    let close_start = self.pos;
                    self.pos += 2;
                    self.skip_tag_ws();

                    match open_tag {
                        None => {
                            if self.peek() == Some('>') {
                                self.bump();
                                return Ok(children);
                            }
                            let found = self.parse_tag_name()?;
                            return Err(ParseError::mismatched_closing_tag(
                                self.source,
                                close_start,
                                "",
                                found,
                            ));
                        }
                        Some(tag) => {
                            let found = self.parse_tag_name()?;
                            self.skip_tag_ws();
                            self.expect_char('>')?;
                            if found != tag {
                                return Err(ParseError::mismatched_closing_tag(
                                    self.source,
                                    close_start,
                                    tag,
                                    found,
                                ));
                            }
                            return Ok(children);
                        }
                    }
                }
                Some('<') => children.push(self.parse_node()?),
                Some('{') => children.push(self.parse_slot_or_comment()?),
                Some(_) => children.push(self.parse_text()?),
            }
        }
    }

    /// Text run up to the next tag or expression slot, kept verbatim
    fn parse_text(&mut self) -> ParseResult<Node> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '<' || c == '{' {
                break;
            }
            self.bump();
        }
        Ok(Node::Text(TextNode {
            value: self.source[start..self.pos].to_string(),
            span: Span::new(start, self.pos),
        }))
    }

    /// `{expression}` child, or a `{/* comment */}` preserved as text
    fn parse_slot_or_comment(&mut self) -> ParseResult<Node> {
        let start = self.pos;
        if let Some(text) = self.try_parse_comment_slot() {
            return Ok(Node::Text(TextNode {
                value: text,
                span: Span::new(start, self.pos),
            }));
        }

        let inner = self.extract_braced()?;
        let expression = Self::parse_expression_source(inner).unwrap_or_else(|| Expression::Raw {
            source: inner.to_string(),
        });
        Ok(Node::Expression(ExpressionSlot {
            expression,
            span: Span::new(start, self.pos),
        }))
    }

    fn try_parse_comment_slot(&mut self) -> Option<String> {
        let save = self.pos;
        self.bump(); // '{'
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
        if !self.starts_with("/*") {
            self.pos = save;
            return None;
        }
        while !self.eof() && !self.starts_with("*/") {
            self.bump();
        }
        if self.eof() {
            self.pos = save;
            return None;
        }
        self.pos += 2;
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
        if self.peek() != Some('}') {
            self.pos = save;
            return None;
        }
        self.bump();
        Some(self.source[save..self.pos].to_string())
    }

    fn parse_attribute(&mut self) -> ParseResult<Attribute> {
        let start = self.pos;
        let name = self.parse_attr_name()?;
        self.skip_tag_ws();

        let value = if self.peek() == Some('=') {
            self.bump();
            self.skip_tag_ws();
            match self.peek() {
                Some(q @ ('"' | '\'')) => AttributeValue::String {
                    value: self.parse_quoted(q)?,
                },
                Some('{') => {
                    let inner = self.extract_braced()?;
                    let expression =
                        Self::parse_expression_source(inner).unwrap_or_else(|| Expression::Raw {
                            source: inner.to_string(),
                        });
                    AttributeValue::Expression { expression }
                }
                Some(c) => {
                    return Err(ParseError::unexpected_char(
                        self.source,
                        self.pos,
                        c,
                        "attribute value",
                    ));
                }
                None => return Err(ParseError::unexpected_eof(self.source, self.pos)),
            }
        } else {
            AttributeValue::Bare
        };

        Ok(Attribute {
            name,
            value,
            span: Span::new(start, self.pos),
        })
    }

    fn parse_tag_name(&mut self) -> ParseResult<String> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
            Some(c) => {
                return Err(ParseError::unexpected_char(self.source, self.pos, c, "tag name"));
            }
            None => return Err(ParseError::unexpected_eof(self.source, self.pos)),
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | '-') {
                self.bump();
            } else {
                break;
            }
        }
        Ok(self.source[start..self.pos].to_string())
    }

    fn parse_attr_name(&mut self) -> ParseResult<String> {
        let start = self.pos;
        match self.peek() {
            Some(c) if is_attr_name_start(c) => {}
            Some(c) => {
                return Err(ParseError::unexpected_char(
                    self.source,
                    self.pos,
                    c,
                    "attribute name",
                ));
            }
            None => return Err(ParseError::unexpected_eof(self.source, self.pos)),
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | ':' | '.' | '-') {
                self.bump();
            } else {
                break;
            }
        }
        Ok(self.source[start..self.pos].to_string())
    }

    fn parse_quoted(&mut self, quote: char) -> ParseResult<String> {
        self.bump(); // opening quote
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == quote {
                let value = self.source[start..self.pos].to_string();
                self.bump();
                return Ok(value);
            }
            self.bump();
        }
        Err(ParseError::unexpected_eof(self.source, self.pos))
    }

    /// Consume a balanced `{ ... }` region, honoring strings, template
    /// literals, and comments, returning the inner source.
    fn extract_braced(&mut self) -> ParseResult<&'src str> {
        let start = self.pos;
        self.skip_braced()?;
        Ok(&self.source[start + 1..self.pos - 1])
    }

    fn skip_braced(&mut self) -> ParseResult<()> {
        let start = self.pos;
        self.bump(); // '{'
        let mut depth = 1usize;
        while let Some(ch) = self.peek() {
            match ch {
                '{' => {
                    depth += 1;
                    self.bump();
                }
                '}' => {
                    depth -= 1;
                    self.bump();
                    if depth == 0 {
                        return Ok(());
                    }
                }
                '"' | '\'' => self.skip_string(ch),
                '`' => self.skip_template_string()?,
                '/' if self.starts_with("//") => self.skip_line_comment(),
                '/' if self.starts_with("/*") => self.skip_block_comment(),
                _ => {
                    self.bump();
                }
            }
        }
        Err(ParseError::unexpected_eof(self.source, start))
    }

    fn skip_string(&mut self, quote: char) {
        self.bump(); // opening quote
        while let Some(ch) = self.peek() {
            if ch == '\\' {
                self.bump();
                self.bump();
                continue;
            }
            self.bump();
            if ch == quote {
                return;
            }
        }
    }

    fn skip_template_string(&mut self) -> ParseResult<()> {
        let start = self.pos;
        self.bump(); // '`'
        while let Some(ch) = self.peek() {
            match ch {
                '\\' => {
                    self.bump();
                    self.bump();
                }
                '`' => {
                    self.bump();
                    return Ok(());
                }
                '$' if self.starts_with("${") => {
                    self.bump();
                    self.skip_braced()?;
                }
                _ => {
                    self.bump();
                }
            }
        }
        Err(ParseError::unexpected_eof(self.source, start))
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) {
        self.pos += 2;
        while !self.eof() && !self.starts_with("*/") {
            self.bump();
        }
        if !self.eof() {
            self.pos += 2;
        }
    }

    fn skip_tag_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn expect_char(&mut self, expected: char) -> ParseResult<()> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(ParseError::unexpected_char(
                self.source,
                self.pos,
                c,
                format!("'{}'", expected),
            )),
            None => Err(ParseError::unexpected_eof(self.source, self.pos)),
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.source[self.pos..].starts_with(prefix)
    }

    /// Parse expression source from inside a `{ ... }` slot. `None` means
    /// the caller should carry the slot verbatim as `Raw`.
    pub(crate) fn parse_expression_source(source: &str) -> Option<Expression> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.starts_with('`') {
            return Self::parse_template_literal(trimmed);
        }
        let tokens = tokenize(trimmed).ok()?;
        let mut parser = ExprParser { tokens, pos: 0 };
        let expr = parser.parse_expr()?;
        if !parser.at_end() {
            return None;
        }
        Some(expr)
    }

    fn parse_template_literal(source: &str) -> Option<Expression> {
        let inner = source.strip_prefix('`')?;
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = inner.char_indices().peekable();

        while let Some((_, ch)) = chars.next() {
            match ch {
                '\\' => {
                    // escape sequences kept raw for lossless output
                    literal.push('\\');
                    if let Some((_, next)) = chars.next() {
                        literal.push(next);
                    }
                }
                '`' => {
                    if chars.next().is_some() {
                        return None;
                    }
                    if !literal.is_empty() {
                        parts.push(TemplatePart::Literal(literal));
                    }
                    return Some(Expression::Template { parts });
                }
                '$' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    if !literal.is_empty() {
                        parts.push(TemplatePart::Literal(std::mem::take(&mut literal)));
                    }
                    let mut depth = 1usize;
                    let mut expr_src = String::new();
                    loop {
                        let (_, c) = chars.next()?;
                        match c {
                            '{' => {
                                depth += 1;
                                expr_src.push(c);
                            }
                            '}' => {
                                depth -= 1;
                                if depth == 0 {
                                    break;
                                }
                                expr_src.push(c);
                            }
                            _ => expr_src.push(c),
                        }
                    }
                    let expr = Self::parse_expression_source(&expr_src)
                        .unwrap_or(Expression::Raw { source: expr_src });
                    parts.push(TemplatePart::Expression(expr));
                }
                _ => literal.push(ch),
            }
        }
        None
    }
}

/// Parser over expression tokens: identifiers, literals, member chains,
/// and object literals. Everything richer stays `Raw`.
struct ExprParser<'src> {
    tokens: Vec<(Token<'src>, std::ops::Range<usize>)>,
    pos: usize,
}

impl<'src> ExprParser<'src> {
    fn parse_expr(&mut self) -> Option<Expression> {
        let mut expr = self.parse_primary()?;
        while self.eat(&Token::Dot) {
            let property = self.ident()?;
            expr = Expression::Member {
                object: Box::new(expr),
                property,
            };
        }
        Some(expr)
    }

    fn parse_primary(&mut self) -> Option<Expression> {
        match self.next()? {
            Token::Ident(name) => Some(Expression::Identifier {
                name: name.to_string(),
            }),
            Token::String(quoted) => Some(Expression::StringLiteral {
                value: unquote(quoted),
            }),
            Token::Number(text) => text
                .parse()
                .ok()
                .map(|value| Expression::NumberLiteral { value }),
            Token::True => Some(Expression::BooleanLiteral { value: true }),
            Token::False => Some(Expression::BooleanLiteral { value: false }),
            Token::LBrace => self.parse_object_rest(),
            _ => None,
        }
    }

    fn parse_object_rest(&mut self) -> Option<Expression> {
        let mut entries = Vec::new();
        if self.eat(&Token::RBrace) {
            return Some(Expression::Object { entries });
        }
        loop {
            let key = match self.next()? {
                Token::Ident(name) => name.to_string(),
                Token::String(quoted) => unquote(quoted),
                _ => return None,
            };
            if !self.eat(&Token::Colon) {
                return None;
            }
            let value = self.parse_expr()?;
            entries.push(ObjectEntry { key, value });

            if self.eat(&Token::Comma) {
                // trailing comma allowed
                if self.eat(&Token::RBrace) {
                    break;
                }
                continue;
            }
            if !self.eat(&Token::RBrace) {
                return None;
            }
            break;
        }
        Some(Expression::Object { entries })
    }

    fn ident(&mut self) -> Option<String> {
        match self.next()? {
            Token::Ident(name) => Some(name.to_string()),
            _ => None,
        }
    }

    fn next(&mut self) -> Option<Token<'src>> {
        let token = self.tokens.get(self.pos)?.0.clone();
        self.pos += 1;
        Some(token)
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.tokens.get(self.pos).map(|(t, _)| t == expected) == Some(true) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}

fn unquote(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Parse a complete source file
pub fn parse(source: &str) -> ParseResult<Document> {
    Parser::new(source).parse_document()
}

/// Parse a standalone markup snippet into its top-level nodes
pub fn parse_snippet(source: &str) -> ParseResult<Vec<Node>> {
    let mut parser = Parser::new(source);
    let mut nodes = Vec::new();
    while !parser.eof() {
        match parser.peek() {
            Some('<') => nodes.push(parser.parse_node()?),
            Some('{') => nodes.push(parser.parse_slot_or_comment()?),
            Some(_) => nodes.push(parser.parse_text()?),
            None => break,
        }
    }
    Ok(nodes)
}

/// Parse expression source as it would appear inside a `{ ... }` slot.
/// `None` when the input is outside the modeled sublanguage.
pub fn parse_expression(source: &str) -> Option<Expression> {
    Parser::parse_expression_source(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_block(doc: &Document) -> &MarkupBlock {
        let mut blocks = doc.markup_blocks();
        let (_, block) = blocks.next().expect("expected a markup block");
        assert!(blocks.next().is_none(), "expected exactly one markup block");
        block
    }

    #[test]
    fn test_parse_bare_markup() {
        let doc = parse(r#"<div><h1 data-editable="t">Old</h1></div>"#).unwrap();
        let block = only_block(&doc);

        let root = block.root.as_element().unwrap();
        assert_eq!(root.tag_name, "div");
        assert_eq!(root.children.len(), 1);

        let heading = root.children[0].as_element().unwrap();
        assert_eq!(heading.tag_name, "h1");
        assert_eq!(heading.editable_id(), Some("t"));
        assert!(matches!(&heading.children[0], Node::Text(t) if t.value == "Old"));
    }

    #[test]
    fn test_parse_attribute_kinds() {
        let doc = parse(r#"<input type="text" disabled value={draft} count={3} />"#).unwrap();
        let root = only_block(&doc).root.as_element().unwrap().clone();

        assert!(root.self_closing);
        assert_eq!(root.attributes.len(), 4);
        assert_eq!(
            root.attribute("type").map(|a| &a.value),
            Some(&AttributeValue::String {
                value: "text".to_string()
            })
        );
        assert_eq!(
            root.attribute("disabled").map(|a| &a.value),
            Some(&AttributeValue::Bare)
        );
        assert_eq!(
            root.attribute("value").map(|a| &a.value),
            Some(&AttributeValue::Expression {
                expression: Expression::Identifier {
                    name: "draft".to_string()
                }
            })
        );
        assert_eq!(
            root.attribute("count").map(|a| &a.value),
            Some(&AttributeValue::Expression {
                expression: Expression::NumberLiteral { value: 3.0 }
            })
        );
    }

    #[test]
    fn test_parse_fragment() {
        let doc = parse("<><p>a</p><p>b</p></>").unwrap();
        match &only_block(&doc).root {
            Node::Fragment(frag) => assert_eq!(frag.children.len(), 2),
            other => panic!("expected fragment, got {:?}", other),
        }
    }

    #[test]
    fn test_whitespace_preserved_as_text() {
        let doc = parse("<div>\n  <span>hi</span>\n</div>").unwrap();
        let root = only_block(&doc).root.as_element().unwrap().clone();

        assert_eq!(root.children.len(), 3);
        assert!(root.children[0].is_whitespace_text());
        assert_eq!(root.children[1].tag_name(), Some("span"));
        assert!(root.children[2].is_whitespace_text());
    }

    #[test]
    fn test_comment_preserved_as_text() {
        let doc = parse("<div>{/* note */}<p>x</p></div>").unwrap();
        let root = only_block(&doc).root.as_element().unwrap().clone();

        match &root.children[0] {
            Node::Text(t) => assert_eq!(t.value, "{/* note */}"),
            other => panic!("expected comment text, got {:?}", other),
        }
    }

    #[test]
    fn test_component_name_from_function() {
        let source = r#"
export default function Hero() {
    return (
        <section data-editable="hero">
            <h1>Welcome</h1>
        </section>
    );
}
"#;
        let doc = parse(source).unwrap();
        let block = only_block(&doc);
        assert_eq!(block.component.as_deref(), Some("Hero"));
    }

    #[test]
    fn test_component_name_from_arrow_const() {
        let source = "const Card = () => <div className=\"card\">x</div>;\n";
        let doc = parse(source).unwrap();
        assert_eq!(only_block(&doc).component.as_deref(), Some("Card"));
    }

    #[test]
    fn test_less_than_is_not_markup() {
        let source = "const smaller = a < b;\nconst bigger = a > b;\n";
        let doc = parse(source).unwrap();
        assert_eq!(doc.markup_blocks().count(), 0);
        assert_eq!(doc.segments.len(), 1);
    }

    #[test]
    fn test_expression_slot_children() {
        let doc = parse("<p>{user.name}{`hi ${name}`}{count}</p>").unwrap();
        let root = only_block(&doc).root.as_element().unwrap().clone();

        match &root.children[0] {
            Node::Expression(slot) => match &slot.expression {
                Expression::Member { object, property } => {
                    assert_eq!(property, "name");
                    assert_eq!(
                        **object,
                        Expression::Identifier {
                            name: "user".to_string()
                        }
                    );
                }
                other => panic!("expected member access, got {:?}", other),
            },
            other => panic!("expected expression slot, got {:?}", other),
        }

        match &root.children[1] {
            Node::Expression(slot) => match &slot.expression {
                Expression::Template { parts } => {
                    assert_eq!(parts.len(), 2);
                    assert_eq!(parts[0], TemplatePart::Literal("hi ".to_string()));
                }
                other => panic!("expected template, got {:?}", other),
            },
            other => panic!("expected expression slot, got {:?}", other),
        }
    }

    #[test]
    fn test_unmodeled_expression_kept_raw() {
        let doc = parse("<ul>{items.map(render)}</ul>").unwrap();
        let root = only_block(&doc).root.as_element().unwrap().clone();

        match &root.children[0] {
            Node::Expression(slot) => assert_eq!(
                slot.expression,
                Expression::Raw {
                    source: "items.map(render)".to_string()
                }
            ),
            other => panic!("expected raw slot, got {:?}", other),
        }
    }

    #[test]
    fn test_style_object_attribute() {
        let doc = parse("<div style={{marginTop: '10px', color: 'red'}}>x</div>").unwrap();
        let root = only_block(&doc).root.as_element().unwrap().clone();

        match &root.attribute("style").unwrap().value {
            AttributeValue::Expression {
                expression: Expression::Object { entries },
            } => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].key, "marginTop");
                assert_eq!(
                    entries[0].value,
                    Expression::StringLiteral {
                        value: "10px".to_string()
                    }
                );
            }
            other => panic!("expected object expression, got {:?}", other),
        }
    }

    #[test]
    fn test_mismatched_closing_tag() {
        let err = parse("<div><p>text</div></p>").unwrap_err();
        assert!(matches!(err, ParseError::MismatchedClosingTag { .. }));
    }

    #[test]
    fn test_unterminated_element() {
        let err = parse("<div><span>abc").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_parse_snippet_multiple_roots() {
        let nodes = parse_snippet("<p>a</p><p>b</p>").unwrap();
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_code_segments_preserved() {
        let source = "import React from 'react';\n\nfunction App() {\n    return <div>x</div>;\n}\n";
        let doc = parse(source).unwrap();

        assert_eq!(doc.segments.len(), 3);
        match &doc.segments[0] {
            Segment::Code { text } => assert!(text.starts_with("import React")),
            other => panic!("expected code segment, got {:?}", other),
        }
        match &doc.segments[2] {
            Segment::Code { text } => assert_eq!(text, ";\n}\n"),
            other => panic!("expected code segment, got {:?}", other),
        }
    }
}
