//! `#[derive(Action)]` for dms-store action enums

use std::collections::BTreeMap;

use darling::ast::Data;
use darling::{FromDeriveInput, FromVariant};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as Tokens;
use quote::{format_ident, quote};
use syn::{parse_macro_input, DeriveInput, Ident};

#[derive(FromDeriveInput)]
#[darling(attributes(action), supports(enum_any))]
struct EnumInput {
    ident: Ident,
    data: Data<VariantInput, ()>,
    /// Derive categories from variant names
    #[darling(default)]
    infer_categories: bool,
}

#[derive(FromVariant)]
#[darling(attributes(action))]
struct VariantInput {
    ident: Ident,
    #[darling(default)]
    category: Option<String>,
    #[darling(default)]
    skip_category: bool,
}

/// Words that close the subject of a variant name:
/// `RolesDelete` is about "roles", `CurrentUserSet` about "current_user".
const VERBS: &[&str] = &[
    "Add", "Authenticate", "Cancel", "Clear", "Close", "Create", "Deauthenticate", "Delete",
    "End", "Get", "Load", "Login", "Logout", "Open", "Remove", "Reset", "Save", "Select", "Set",
    "Start", "Submit", "Update",
];

fn words(name: &str) -> Vec<&str> {
    let mut starts: Vec<usize> = name
        .char_indices()
        .filter(|(i, c)| *i > 0 && c.is_uppercase())
        .map(|(i, _)| i)
        .collect();
    starts.insert(0, 0);
    starts.push(name.len());
    starts
        .windows(2)
        .map(|w| &name[w[0]..w[1]])
        .filter(|w| !w.is_empty())
        .collect()
}

/// Subject words before the first verb, snake_cased. A name that opens with
/// a verb or contains none has no category.
fn infer_category(name: &str) -> Option<String> {
    let words = words(name);
    let verb = words.iter().position(|w| VERBS.contains(w))?;
    if verb == 0 {
        return None;
    }
    let subject: Vec<String> = words[..verb].iter().map(|w| w.to_lowercase()).collect();
    Some(subject.join("_"))
}

fn pascal(snake: &str) -> Ident {
    let joined: String = snake
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            chars
                .next()
                .map(|c| c.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect();
    format_ident!("{}", joined)
}

/// Derive `dms_store::Action`
///
/// `name()` returns the variant name. With `#[action(infer_categories)]`
/// the enum also gets a `{Enum}Category` enum, inherent `category()` and
/// `category_enum()`, one `is_<category>()` predicate per category, and an
/// `ActionCategory` impl. Per variant, `#[action(category = "...")]` sets the
/// category and `#[action(skip_category)]` leaves it uncategorized.
///
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// #[action(infer_categories)]
/// enum AppAction {
///     RolesLoad(Vec<Role>),
///     RolesDelete { id: IdRef },
///     #[action(category = "search")]
///     SearchUsersLoad(Vec<User>),
/// }
///
/// assert_eq!(AppAction::RolesLoad(vec![]).category(), Some("roles"));
/// assert!(AppAction::SearchUsersLoad(vec![]).is_search());
/// ```
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let parsed = match EnumInput::from_derive_input(&input) {
        Ok(parsed) => parsed,
        Err(e) => return e.write_errors().into(),
    };
    let Data::Enum(variants) = &parsed.data else {
        return syn::Error::new_spanned(&input, "Action can only be derived for enums")
            .to_compile_error()
            .into();
    };

    let name = &parsed.ident;
    let mut out = name_impl(name, variants);
    if parsed.infer_categories {
        out.extend(category_impl(name, variants));
    }
    out.into()
}

fn name_impl(name: &Ident, variants: &[VariantInput]) -> Tokens {
    let arms = variants.iter().map(|v| {
        let ident = &v.ident;
        let text = ident.to_string();
        // `{ .. }` matches unit, tuple and struct variants alike
        quote! { #name::#ident { .. } => #text }
    });
    quote! {
        impl ::dms_store::Action for #name {
            fn name(&self) -> &'static str {
                match self {
                    #(#arms,)*
                }
            }
        }
    }
}

fn category_impl(name: &Ident, variants: &[VariantInput]) -> Tokens {
    let category_of = |v: &VariantInput| -> Option<String> {
        if v.skip_category {
            None
        } else {
            v.category
                .clone()
                .or_else(|| infer_category(&v.ident.to_string()))
        }
    };

    // Sorted so the generated enum does not depend on declaration order
    let mut members: BTreeMap<String, Vec<&Ident>> = BTreeMap::new();
    let mut str_arms = Vec::new();
    let mut enum_arms = Vec::new();
    let cat_enum = format_ident!("{}Category", name);

    for v in variants {
        let ident = &v.ident;
        match category_of(v) {
            Some(category) => {
                let member = pascal(&category);
                str_arms.push(quote! { #name::#ident { .. } => ::core::option::Option::Some(#category) });
                enum_arms.push(quote! { #name::#ident { .. } => #cat_enum::#member });
                members.entry(category).or_default().push(ident);
            }
            None => {
                str_arms.push(quote! { #name::#ident { .. } => ::core::option::Option::None });
                enum_arms.push(quote! { #name::#ident { .. } => #cat_enum::Uncategorized });
            }
        }
    }

    let cat_names: Vec<&String> = members.keys().collect();
    let cat_members: Vec<Ident> = members.keys().map(|c| pascal(c)).collect();
    let predicates = members.iter().map(|(category, idents)| {
        let predicate = format_ident!("is_{}", category);
        let doc = format!("Whether this action is in the `{}` category", category);
        quote! {
            #[doc = #doc]
            pub fn #predicate(&self) -> bool {
                matches!(self, #(#name::#idents { .. })|*)
            }
        }
    });
    let enum_doc = format!("Categories of [`{}`]", name);

    quote! {
        #[doc = #enum_doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum #cat_enum {
            #(#cat_members,)*
            Uncategorized,
        }

        impl #cat_enum {
            pub fn all() -> &'static [Self] {
                &[#(Self::#cat_members,)* Self::Uncategorized]
            }

            pub fn name(&self) -> &'static str {
                match self {
                    #(Self::#cat_members => #cat_names,)*
                    Self::Uncategorized => "uncategorized",
                }
            }
        }

        impl #name {
            pub fn category(&self) -> ::core::option::Option<&'static str> {
                match self {
                    #(#str_arms,)*
                }
            }

            pub fn category_enum(&self) -> #cat_enum {
                match self {
                    #(#enum_arms,)*
                }
            }

            #(#predicates)*
        }

        impl ::dms_store::ActionCategory for #name {
            type Category = #cat_enum;

            fn category(&self) -> ::core::option::Option<&'static str> {
                #name::category(self)
            }

            fn category_enum(&self) -> Self::Category {
                #name::category_enum(self)
            }
        }
    }
}
