use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Attribute, Data, DeriveInput, Field, Fields, FieldsNamed, GenericArgument, Ident,
    PathArguments, Type, Variant,
};

/// What the expansion needs to know about one enum variant.
struct ErrorVariant<'a> {
    ident: &'a Ident,
    source: Option<(&'a Ident, &'a Type)>,
    cfg_attrs: Vec<&'a Attribute>,
}

pub fn expand_derive(input: DeriveInput) -> TokenStream {
    let name = &input.ident;
    let ext_trait = format_ident!("{}Ext", name);

    let Data::Enum(data) = &input.data else {
        return quote! { compile_error!("zitems_error can only be applied to enums"); };
    };
    if data.variants.is_empty() {
        return syn::Error::new_spanned(name, "zitems_error requires at least one variant")
            .to_compile_error();
    }

    let variants = match data.variants.iter().map(inspect_variant).collect::<Result<Vec<_>, _>>()
    {
        Ok(variants) => variants,
        Err(err) => return err.to_compile_error(),
    };

    let missing = missing_derives(&input);
    let derives = if missing.is_empty() {
        quote! {}
    } else {
        quote! { #[derive(#(#missing),*)] }
    };

    let ext = expand_ext_trait(name, &ext_trait, &variants);
    let conversions = variants.iter().filter_map(|v| expand_source_conversion(name, &ext_trait, v));
    let internal = expand_internal_conversions(name, &variants);
    let note = expand_context_note(name, &variants);

    quote! {
        #[allow(non_shorthand_field_patterns)]
        #derives
        #input

        #ext
        #(#conversions)*
        #internal
        #note

        #[allow(dead_code)]
        fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
            context.as_ref().map_or(std::borrow::Cow::Borrowed(""), |c| std::borrow::Cow::Owned(format!(" ({c})")))
        }
    }
}

fn inspect_variant(variant: &Variant) -> syn::Result<ErrorVariant<'_>> {
    let Fields::Named(fields) = &variant.fields else {
        return Err(syn::Error::new_spanned(
            variant,
            "zitems_error requires named fields (at least `context`) on every variant",
        ));
    };

    require_context_field(variant, fields)?;

    let source = fields.named.iter().find(|field| is_source_field(field)).and_then(|field| {
        field.ident.as_ref().map(|ident| (ident, &field.ty))
    });

    Ok(ErrorVariant {
        ident: &variant.ident,
        source,
        cfg_attrs: variant.attrs.iter().filter(|attr| attr.path().is_ident("cfg")).collect(),
    })
}

fn require_context_field(variant: &Variant, fields: &FieldsNamed) -> syn::Result<()> {
    let context = fields
        .named
        .iter()
        .find(|field| field.ident.as_ref().is_some_and(|ident| ident == "context"));

    match context {
        None => Err(syn::Error::new_spanned(
            &variant.ident,
            "zitems_error requires `context: Option<Cow<'static, str>>` on every variant",
        )),
        Some(field) if !is_optional_static_cow(&field.ty) => Err(syn::Error::new_spanned(
            &field.ty,
            "context field must be Option<Cow<'static, str>>",
        )),
        Some(_) => Ok(()),
    }
}

fn is_source_field(field: &Field) -> bool {
    field.ident.as_ref().is_some_and(|ident| ident == "source")
        || field.attrs.iter().any(|attr| attr.path().is_ident("source") || attr.path().is_ident("from"))
}

fn expand_ext_trait(name: &Ident, ext_trait: &Ident, variants: &[ErrorVariant<'_>]) -> TokenStream {
    let arms = variants.iter().map(|v| {
        let cfg_attrs = &v.cfg_attrs;
        let ident = v.ident;
        quote! { #(#cfg_attrs)* #name::#ident { context: slot, .. } => *slot = Some(context.into()), }
    });

    quote! {
        pub trait #ext_trait<T> {
            /// Attaches a human-readable note to the error, replacing any previous one.
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #ext_trait<T> for Result<T, #name> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut err| {
                    match &mut err {
                        #( #arms )*
                    }
                    err
                })
            }
        }
    }
}

fn expand_source_conversion(
    name: &Ident,
    ext_trait: &Ident,
    variant: &ErrorVariant<'_>,
) -> Option<TokenStream> {
    if variant.ident == "Internal" {
        return None;
    }
    let (field, ty) = variant.source?;
    let ident = variant.ident;
    let cfg_attrs = &variant.cfg_attrs;

    Some(quote! {
        #(#cfg_attrs)*
        #[automatically_derived]
        impl From<#ty> for #name {
            #[inline]
            fn from(#field: #ty) -> Self { Self::#ident { #field, context: None } }
        }

        #(#cfg_attrs)*
        #[automatically_derived]
        impl<T> #ext_trait<T> for std::result::Result<T, #ty> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> std::result::Result<T, #name> {
                self.map_err(|#field| #name::#ident { #field, context: Some(context.into()) })
            }
        }
    })
}

fn expand_internal_conversions(name: &Ident, variants: &[ErrorVariant<'_>]) -> TokenStream {
    let Some(internal) = variants.iter().find(|v| v.ident == "Internal") else {
        return quote!();
    };
    let cfg_attrs = &internal.cfg_attrs;

    quote! {
        #(#cfg_attrs)*
        #[automatically_derived]
        impl From<&'static str> for #name {
            #[inline]
            fn from(s: &'static str) -> Self { Self::Internal { message: std::borrow::Cow::Borrowed(s), context: None } }
        }

        #(#cfg_attrs)*
        #[automatically_derived]
        impl From<String> for #name {
            #[inline]
            fn from(s: String) -> Self { Self::Internal { message: std::borrow::Cow::Owned(s), context: None } }
        }
    }
}

fn expand_context_note(name: &Ident, variants: &[ErrorVariant<'_>]) -> TokenStream {
    let arms = variants.iter().map(|v| {
        let cfg_attrs = &v.cfg_attrs;
        let ident = v.ident;
        quote! { #(#cfg_attrs)* Self::#ident { context, .. } => context.as_deref(), }
    });

    quote! {
        #[automatically_derived]
        impl #name {
            /// Returns the note attached through `.context(...)`, if any.
            #[must_use]
            #[allow(dead_code)]
            pub fn context_note(&self) -> Option<&str> {
                match self {
                    #( #arms )*
                }
            }
        }
    }
}

/// Collects `Debug` and `thiserror::Error` unless the enum already derives them.
fn missing_derives(input: &DeriveInput) -> Vec<TokenStream> {
    let mut present = FxHashSet::default();
    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                present.insert(segment.ident.to_string());
            }
            Ok(())
        });
    }

    let mut missing = Vec::new();
    if !present.contains("Debug") {
        missing.push(quote! { Debug });
    }
    if !present.contains("Error") {
        missing.push(quote! { ::thiserror::Error });
    }
    missing
}

/// Matches `Option<Cow<'static, str>>` by the last path segment of each layer.
fn is_optional_static_cow(ty: &Type) -> bool {
    let Some(inner) = single_generic(ty, "Option") else {
        return false;
    };
    let Type::Path(path) = inner else {
        return false;
    };
    let Some(segment) = path.path.segments.last() else {
        return false;
    };
    if segment.ident != "Cow" {
        return false;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return false;
    };

    let mut args = args.args.iter();
    let static_lifetime =
        matches!(args.next(), Some(GenericArgument::Lifetime(lt)) if lt.ident == "static");
    let str_target = matches!(
        args.next(),
        Some(GenericArgument::Type(Type::Path(target)))
            if target.path.segments.last().is_some_and(|seg| seg.ident == "str")
    );
    static_lifetime && str_target
}

fn single_generic<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
