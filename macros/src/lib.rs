//! Proc macros for trellis: `markup!` templates.
//!
//! This crate is not meant to be used directly. Enable the `macros` feature on
//! `trellis`.

use proc_macro::TokenStream;

mod markup_macro;

/// HTML-like template macro producing a `trellis::markup::Markup`.
///
/// # Syntax
///
/// - `<tag />` is a self-closing element
/// - `<tag attr="val"> ... </tag>` is an element with children
/// - `attr={expr}` takes any value convertible into `AttrValue`
/// - a bare `attr` is a boolean attribute
/// - `"text"` is a text run and `{expr}` any value convertible into `Markup`
///
/// Attribute names may be hyphenated (`data-role`). Several top-level nodes
/// produce a fragment.
///
/// # Example
///
/// ```ignore
/// markup! {
///     <div id={scope.id()} class="game">
///         <h1>"Typing"</h1>
///         {scope.render_child("answer")?}
///     </div>
/// }
/// ```
#[proc_macro]
pub fn markup(input: TokenStream) -> TokenStream {
    markup_macro::markup_impl(input.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
