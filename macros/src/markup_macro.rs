//! `markup!` macro: parse HTML-like templates and generate trellis builder code.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::{braced, Error, Expr, Ident, LitStr, Result, Token};

// ---------------------------------------------------------------------------
// AST types
// ---------------------------------------------------------------------------

/// Attribute value: a literal, a braced expression, or nothing (a flag).
#[derive(Clone)]
pub(crate) enum AttrValue {
    Literal(LitStr),
    Expr(Expr),
    Flag,
}

/// A parsed attribute: `name="value"`, `name={expr}` or a bare `name`.
#[derive(Clone)]
pub(crate) struct Attribute {
    pub name: String,
    pub span: Span,
    pub value: AttrValue,
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match &self.value {
            AttrValue::Literal(lit) => lit.value(),
            AttrValue::Expr(_) => "{..}".to_owned(),
            AttrValue::Flag => "<flag>".to_owned(),
        };
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("value", &value)
            .finish()
    }
}

/// Element content.
#[derive(Clone)]
pub(crate) enum Node {
    Element(Element),
    Text(LitStr),
    Expr(Expr),
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Element(el) => el.fmt(f),
            Node::Text(lit) => write!(f, "Text({:?})", lit.value()),
            Node::Expr(_) => f.write_str("Expr"),
        }
    }
}

/// A parsed element: `<tag attrs... />` or `<tag attrs...> children </tag>`.
#[derive(Clone)]
pub(crate) struct Element {
    pub tag: Ident,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
    pub self_closing: bool,
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag.to_string())
            .field("attrs", &self.attrs)
            .field("children", &self.children)
            .field("self_closing", &self.self_closing)
            .finish()
    }
}

/// The top-level markup! input: a sequence of nodes.
#[derive(Debug)]
struct MarkupInput {
    nodes: Vec<Node>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

impl Parse for MarkupInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut nodes = Vec::new();
        while !input.is_empty() {
            nodes.push(parse_node(input)?);
        }
        Ok(MarkupInput { nodes })
    }
}

/// Parse an element, a text literal or a braced expression.
fn parse_node(input: ParseStream) -> Result<Node> {
    if input.peek(Token![<]) {
        return parse_element(input).map(Node::Element);
    }
    if input.peek(LitStr) {
        return input.parse().map(Node::Text);
    }
    if input.peek(syn::token::Brace) {
        let content;
        braced!(content in input);
        return content.parse().map(Node::Expr);
    }
    Err(input.error("expected an element, a string literal or a `{expression}`"))
}

/// Parse a possibly hyphenated name such as `data-role`. Keywords are allowed.
fn parse_name(input: ParseStream) -> Result<(String, Span)> {
    let first = Ident::parse_any(input)?;
    let span = first.span();
    let mut name = first.to_string();
    while input.peek(Token![-]) {
        input.parse::<Token![-]>()?;
        let part = Ident::parse_any(input)?;
        name.push('-');
        name.push_str(&part.to_string());
    }
    Ok((name, span))
}

/// Parse a single element from the token stream.
pub(crate) fn parse_element(input: ParseStream) -> Result<Element> {
    input.parse::<Token![<]>()?;
    let tag = Ident::parse_any(input)?;

    let mut attrs = Vec::new();
    loop {
        if input.peek(Token![/]) {
            input.parse::<Token![/]>()?;
            input.parse::<Token![>]>()?;
            return Ok(Element {
                tag,
                attrs,
                children: Vec::new(),
                self_closing: true,
            });
        }

        if input.peek(Token![>]) {
            input.parse::<Token![>]>()?;
            break;
        }

        let (name, span) = parse_name(input)?;
        let value = if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            if input.peek(syn::token::Brace) {
                let content;
                braced!(content in input);
                AttrValue::Expr(content.parse()?)
            } else {
                AttrValue::Literal(input.parse()?)
            }
        } else {
            AttrValue::Flag
        };
        attrs.push(Attribute { name, span, value });
    }

    let mut children = Vec::new();
    loop {
        if input.is_empty() {
            return Err(Error::new(
                tag.span(),
                format!("unclosed element: expected `</{tag}>`"),
            ));
        }

        if input.peek(Token![<]) && input.peek2(Token![/]) {
            input.parse::<Token![<]>()?;
            input.parse::<Token![/]>()?;
            let closing_tag = Ident::parse_any(input)?;
            if closing_tag != tag {
                return Err(Error::new(
                    closing_tag.span(),
                    format!(
                        "mismatched closing tag: expected `</{}>`, found `</{}>`",
                        tag, closing_tag
                    ),
                ));
            }
            input.parse::<Token![>]>()?;
            break;
        }

        children.push(parse_node(input)?);
    }

    Ok(Element {
        tag,
        attrs,
        children,
        self_closing: false,
    })
}

// ---------------------------------------------------------------------------
// Code generation
// ---------------------------------------------------------------------------

/// Generate the builder chain for a single element.
fn generate_element(elem: &Element) -> TokenStream {
    let tag = LitStr::new(&elem.tag.unraw().to_string(), elem.tag.span());

    let mut builder_calls = Vec::new();
    for attr in &elem.attrs {
        let name = LitStr::new(&attr.name, attr.span);
        let call = match &attr.value {
            AttrValue::Literal(lit) => quote! { .attr(#name, #lit) },
            AttrValue::Expr(expr) => quote! { .attr(#name, #expr) },
            AttrValue::Flag => quote! { .attr(#name, true) },
        };
        builder_calls.push(call);
    }

    for child in &elem.children {
        builder_calls.push(match child {
            Node::Element(el) => {
                let code = generate_element(el);
                quote! { .child(#code) }
            }
            Node::Text(lit) => quote! { .text(#lit) },
            Node::Expr(expr) => quote! { .child(#expr) },
        });
    }

    quote! {
        ::trellis::markup::Element::new(#tag) #(#builder_calls)*
    }
}

fn generate_node(node: &Node) -> TokenStream {
    match node {
        Node::Element(el) => {
            let code = generate_element(el);
            quote! { ::trellis::markup::Markup::from(#code) }
        }
        Node::Text(lit) => quote! { ::trellis::markup::Markup::text(#lit) },
        Node::Expr(expr) => quote! { ::trellis::markup::Markup::from(#expr) },
    }
}

/// Entry point: generate code for the entire markup! macro.
pub(crate) fn markup_impl(input: TokenStream) -> Result<TokenStream> {
    let parsed: MarkupInput = syn::parse2(input)?;

    match parsed.nodes.as_slice() {
        [] => Err(Error::new(
            Span::call_site(),
            "markup! macro requires at least one node",
        )),
        [single] => Ok(generate_node(single)),
        nodes => {
            let items: Vec<TokenStream> = nodes.iter().map(generate_node).collect();
            Ok(quote! {
                ::trellis::markup::Markup::Fragment(vec![#(#items),*])
            })
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
