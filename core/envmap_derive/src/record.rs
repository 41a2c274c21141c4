/*
 * Licensed to the Apache Software Foundation (ASF) under one
 * or more contributor license agreements.  See the NOTICE file
 * distributed with this work for additional information
 * regarding copyright ownership.  The ASF licenses this file
 * to you under the Apache License, Version 2.0 (the
 * "License"); you may not use this file except in compliance
 * with the License.  You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing,
 * software distributed under the License is distributed on an
 * "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
 * KIND, either express or implied.  See the License for the
 * specific language governing permissions and limitations
 * under the License.
 */

use darling::{FromDeriveInput, FromField};
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{DeriveInput, Generics, Ident, Type};

/// Container-level options. Only named structs are supported.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(env), supports(struct_named))]
struct RecordOpts {
    ident: Ident,
    generics: Generics,
    data: darling::ast::Data<darling::util::Ignored, FieldOpts>,
}

/// Field-level attributes for `#[env(...)]`
#[derive(Debug, FromField)]
#[darling(attributes(env))]
struct FieldOpts {
    ident: Option<Ident>,
    ty: Type,

    /// Output key name; makes the field a leaf value
    #[darling(default)]
    name: Option<String>,

    /// Marker recorded on the key tag, never enforced
    #[darling(default)]
    required: bool,

    /// Mask the value in log output
    #[darling(default)]
    secret: bool,

    /// Prefix prepended to the keys below this field
    #[darling(default)]
    prefix: Option<String>,

    /// Sequence join separator override
    #[darling(default)]
    separator: Option<String>,

    /// Map entry separator override
    #[darling(default)]
    pair_separator: Option<String>,

    /// Map key/value separator override
    #[darling(default)]
    key_value_separator: Option<String>,

    /// Force the field to be walked as a nested record
    #[darling(default)]
    nested: bool,

    /// Value type that is never walked, e.g. an enum or a `MarshalText` newtype
    #[darling(default)]
    leaf: bool,

    /// Leave the field out entirely
    #[darling(default)]
    skip: bool,
}

/// How a field takes part in the walk.
enum FieldKind {
    Leaf,
    Record,
    Ignored,
}

pub fn generate_impl(input: &DeriveInput) -> TokenStream2 {
    match RecordOpts::from_derive_input(input) {
        Ok(opts) => generate_from_opts(opts).unwrap_or_else(|e| e.write_errors()),
        Err(e) => e.write_errors(),
    }
}

fn generate_from_opts(opts: RecordOpts) -> darling::Result<TokenStream2> {
    let type_name = &opts.ident;
    let (impl_generics, ty_generics, where_clause) = opts.generics.split_for_impl();

    let fields = opts
        .data
        .take_struct()
        .ok_or_else(|| darling::Error::unsupported_shape("enum"))?
        .fields;

    let mut errors = darling::Error::accumulator();
    let mut entries = Vec::new();
    for field in &fields {
        if let Some(entry) = errors.handle(generate_field_entry(field)) {
            entries.extend(entry);
        }
    }
    errors.finish()?;

    Ok(quote! {
        impl #impl_generics ::envmap::Record for #type_name #ty_generics #where_clause {
            fn fields(&self) -> ::std::vec::Vec<::envmap::Field<'_>> {
                ::std::vec![
                    #(#entries),*
                ]
            }
        }
    })
}

fn classify(field: &FieldOpts) -> darling::Result<FieldKind> {
    if field.skip {
        return Ok(FieldKind::Ignored);
    }

    let has_separators = field.separator.is_some()
        || field.pair_separator.is_some()
        || field.key_value_separator.is_some();

    match &field.name {
        Some(name) if name.is_empty() => {
            Err(darling::Error::custom("`name` must not be empty").with_span(&field.ty))
        }
        Some(_) if field.nested => Err(darling::Error::custom(
            "`name` and `nested` cannot be combined: a nested record has no key of its own",
        )
        .with_span(&field.ty)),
        Some(_) => Ok(FieldKind::Leaf),
        None if field.required || field.secret || has_separators => Err(darling::Error::custom(
            "`required`, `secret` and separator options need a key `name`",
        )
        .with_span(&field.ty)),
        None if field.leaf && (field.nested || field.prefix.is_some()) => Err(
            darling::Error::custom("`leaf` cannot be combined with `nested` or `prefix`")
                .with_span(&field.ty),
        ),
        None if field.nested || field.prefix.is_some() => Ok(FieldKind::Record),
        // Unnamed values contribute nothing; anything else is assumed to be a record.
        None if field.leaf || is_leaf_type(&field.ty) => Ok(FieldKind::Ignored),
        None => Ok(FieldKind::Record),
    }
}

fn generate_field_entry(field: &FieldOpts) -> darling::Result<Option<TokenStream2>> {
    let kind = classify(field)?;
    let Some(ident) = &field.ident else {
        return Ok(None);
    };
    let field_name = ident.to_string();
    let field_name = field_name.strip_prefix("r#").unwrap_or(&field_name);
    let tags = generate_tags(field);

    let entry = match kind {
        FieldKind::Ignored => return Ok(None),
        FieldKind::Leaf => quote! {
            ::envmap::Field::leaf(#field_name, #tags, &self.#ident)
        },
        // A missing `Record` impl is reported at the field type.
        FieldKind::Record => quote_spanned! {field.ty.span()=>
            ::envmap::Field::record(#field_name, #tags, &self.#ident)
        },
    };
    Ok(Some(entry))
}

fn generate_tags(field: &FieldOpts) -> TokenStream2 {
    let key = field.name.as_ref().map(|name| quote! { .key(#name) });
    let required = field.required.then(|| quote! { .required() });
    let secret = field.secret.then(|| quote! { .secret() });
    let prefix = field.prefix.as_ref().map(|p| quote! { .prefix(#p) });
    let separator = field.separator.as_ref().map(|s| quote! { .separator(#s) });
    let pair_separator = field
        .pair_separator
        .as_ref()
        .map(|s| quote! { .pair_separator(#s) });
    let key_value_separator = field
        .key_value_separator
        .as_ref()
        .map(|s| quote! { .key_value_separator(#s) });

    quote! {
        ::envmap::FieldTags::new()
            #key
            #required
            #secret
            #prefix
            #separator
            #pair_separator
            #key_value_separator
    }
}

/// Check if a type is a value type that never needs nested expansion.
fn is_leaf_type(ty: &Type) -> bool {
    let ty = match ty {
        Type::Reference(reference) => return is_leaf_type(&reference.elem),
        Type::Array(_) | Type::Slice(_) | Type::Tuple(_) => return true,
        Type::Path(type_path) => type_path,
        _ => return false,
    };
    let Some(segment) = ty.path.segments.last() else {
        return false;
    };

    let ident = segment.ident.to_string();
    if matches!(
        ident.as_str(),
        "bool"
            | "char"
            | "u8"
            | "u16"
            | "u32"
            | "u64"
            | "u128"
            | "usize"
            | "i8"
            | "i16"
            | "i32"
            | "i64"
            | "i128"
            | "isize"
            | "f32"
            | "f64"
            | "String"
            | "str"
            | "Duration"
            | "PathBuf"
            | "Path"
            | "IpAddr"
            | "Ipv4Addr"
            | "Ipv6Addr"
            | "SocketAddr"
            | "SocketAddrV4"
            | "SocketAddrV6"
            | "Vec"
            | "VecDeque"
            | "BTreeSet"
            | "HashMap"
            | "BTreeMap"
    ) {
        return true;
    }

    // Option<T>, Box<T> and friends - check inner type
    if matches!(ident.as_str(), "Option" | "Box" | "Arc" | "Rc" | "Cow")
        && let syn::PathArguments::AngleBracketed(args) = &segment.arguments
    {
        return args.args.iter().any(|arg| match arg {
            syn::GenericArgument::Type(inner) => is_leaf_type(inner),
            _ => false,
        });
    }

    false
}
