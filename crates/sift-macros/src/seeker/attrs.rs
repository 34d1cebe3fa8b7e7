//! Attribute parsing for the Seekable derive macro.
//!
//! This module provides parsers for the `#[seek(...)]` field attributes
//! used by the `Seekable` derive macro, and reads `#[serde(rename = "...")]`
//! so serialized names work as query names too.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    token, Attribute, Error, Expr, Lit, LitStr, Meta, Result, Token,
};

/// Field-level attributes from `#[seek(...)]`.
#[derive(Debug, Clone)]
pub struct SeekAttr {
    /// Skip this field from seeking.
    pub skip: bool,
    /// Expand this struct-typed field into dotted keys.
    pub nested: bool,
    /// Additional query name for this field.
    pub rename: Option<String>,
    /// The span for error reporting.
    pub span: Span,
}

impl Default for SeekAttr {
    fn default() -> Self {
        SeekAttr {
            skip: false,
            nested: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl Parse for SeekAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = SeekAttr {
            span: input.span(),
            ..SeekAttr::default()
        };

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => attr.skip = true,
                Meta::Path(p) if p.is_ident("nested") => attr.nested = true,

                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    if let Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    {
                        attr.rename = Some(s.value());
                    } else {
                        return Err(Error::new(
                            nv.value.span(),
                            "rename must be a string literal",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown seek attribute. Expected: skip, nested, or rename = \"...\"",
                    ));
                }
            }
        }

        if attr.skip && (attr.nested || attr.rename.is_some()) {
            return Err(Error::new(
                attr.span,
                "skip cannot be combined with nested or rename",
            ));
        }

        Ok(attr)
    }
}

/// Extract `#[seek(...)]` attributes from a field's attributes.
pub fn parse_seek_attrs(attrs: &[Attribute]) -> Result<SeekAttr> {
    for attr in attrs {
        if attr.path().is_ident("seek") {
            return attr.parse_args::<SeekAttr>();
        }
    }
    Ok(SeekAttr::default())
}

/// Returns the `rename = "..."` value of a field's `#[serde(...)]` attributes.
///
/// Other serde options are ignored; malformed serde attributes are left for
/// serde's own derive to report.
pub fn serde_rename(attrs: &[Attribute]) -> Option<String> {
    let mut rename = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") && meta.input.peek(Token![=]) {
                let lit: LitStr = meta.value()?.parse()?;
                rename = Some(lit.value());
            } else if meta.input.peek(Token![=]) {
                meta.value()?.parse::<Expr>()?;
            } else if meta.input.peek(token::Paren) {
                meta.parse_nested_meta(|inner| {
                    if inner.input.peek(Token![=]) {
                        inner.value()?.parse::<Expr>()?;
                    }
                    Ok(())
                })?;
            }
            Ok(())
        });
    }
    rename
}
