//! Call-site identifiers and static method markers.
//!
//! A guarded function identifies itself with [`call_site!`](crate::call_site),
//! which resolves to the function's path at compile time, and declares its
//! requirement with [`authorize!`](crate::authorize). Both produce the same
//! `module::path::function` key, so the manager can find the marker without
//! walking the stack.
//!
//! ```ignore
//! use modkit_role_authz::{authorize, call_site, AuthorizationManager};
//!
//! authorize!(delete_user => "admin");
//!
//! fn delete_user(ctx: &ExecutionContext, authz: &impl AuthorizationManager) -> Result<(), Error> {
//!     if !authz.check_permission(ctx, &call_site!()) {
//!         return Err(Error::Forbidden);
//!     }
//!     // ...
//! }
//! ```

use std::borrow::Cow;
use std::fmt;

/// Stable identifier of a guarded function: its full path, e.g.
/// `my_crate::users::delete_user`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallSite(Cow<'static, str>);

impl CallSite {
    #[must_use]
    pub const fn from_static(path: &'static str) -> Self {
        Self(Cow::Borrowed(path))
    }

    #[must_use]
    pub fn new(path: impl Into<Cow<'static, str>>) -> Self {
        Self(path.into())
    }

    /// Build a call site from the type name of a marker fn nested in the
    /// guarded function. Used by [`call_site!`](crate::call_site).
    ///
    /// Strips the marker fn's own segment and any closure or async body
    /// segments, leaving the enclosing function's path. Generic arguments are
    /// dropped (`Queue<_>::drain` becomes `Queue::drain`), and a trait impl
    /// method is keyed by its implementing type (`<Ledger as Audit>::close`
    /// becomes `Ledger::close`).
    #[doc(hidden)]
    #[must_use]
    pub fn from_nested_fn(type_name: &'static str) -> Self {
        let mut path = type_name
            .rsplit_once("::")
            .map_or(type_name, |(parent, _)| parent);
        while let Some(parent) = path.strip_suffix("::{{closure}}") {
            path = parent;
        }
        if !path.contains('<') {
            return Self::from_static(path);
        }
        Self::new(strip_generic_args(&unqualify(path)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0.into_owned()
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A method marker declared with [`authorize!`](crate::authorize) and
/// collected at link time.
#[derive(Debug, Clone, Copy)]
pub struct MethodMarker {
    /// Full path of the guarded function.
    pub call_site: &'static str,
    /// Comma-delimited role list.
    pub roles: &'static str,
}

impl MethodMarker {
    #[must_use]
    pub const fn new(call_site: &'static str, roles: &'static str) -> Self {
        Self { call_site, roles }
    }
}

inventory::collect!(MethodMarker);

/// `<a::Ledger<_> as a::Audit>::close` -> `a::Ledger<_>::close`.
fn unqualify(path: &str) -> Cow<'_, str> {
    let Some(inner) = path.strip_prefix('<') else {
        return Cow::Borrowed(path);
    };

    let mut depth = 0usize;
    let mut prev = '\0';
    let mut self_type_end = None;
    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' if prev != '-' => {
                if depth == 0 {
                    let self_type = &inner[..self_type_end.unwrap_or(i)];
                    return Cow::Owned(format!("{self_type}{}", &inner[i + 1..]));
                }
                depth -= 1;
            }
            ' ' if depth == 0 && self_type_end.is_none() && inner[i..].starts_with(" as ") => {
                self_type_end = Some(i);
            }
            _ => {}
        }
        prev = c;
    }
    Cow::Borrowed(path)
}

/// Drop every `<...>` generic argument list, leaving `->` alone.
fn strip_generic_args(path: &str) -> String {
    let mut stripped = String::with_capacity(path.len());
    let mut depth = 0usize;
    let mut prev = '\0';
    for c in path.chars() {
        match c {
            '<' => depth += 1,
            '>' if prev != '-' => depth = depth.saturating_sub(1),
            _ if depth == 0 => stripped.push(c),
            _ => {}
        }
        prev = c;
    }
    stripped
}

/// Identify the enclosing function as a [`CallSite`].
///
/// Resolves to the same path [`authorize!`](crate::authorize) registers for
/// a free function or inherent method declared in the same module. Methods of
/// generic impls and trait impls resolve to `Type::method`; declare their
/// marker with `authorize!(Type::method => ..)` in the module that defines
/// `Type`.
#[macro_export]
macro_rules! call_site {
    () => {{
        fn call_site_anchor() {}
        $crate::CallSite::from_nested_fn(::std::any::type_name_of_val(&call_site_anchor))
    }};
}

/// Declare the roles required by a function in the current module.
///
/// ```ignore
/// authorize!(purge_cache => "admin");
/// authorize!(Reports::export => "admin,auditor");
/// ```
///
/// The `Type::method` form covers inherent methods, methods of generic impls
/// (written without generic arguments) and trait impl methods, provided
/// `Type` is defined in the invoking module.
#[macro_export]
macro_rules! authorize {
    ($function:ident => $roles:expr) => {
        $crate::inventory::submit! {
            $crate::MethodMarker::new(
                ::core::concat!(::core::module_path!(), "::", ::core::stringify!($function)),
                $roles,
            )
        }
    };
    ($owner:ident :: $function:ident => $roles:expr) => {
        $crate::inventory::submit! {
            $crate::MethodMarker::new(
                ::core::concat!(
                    ::core::module_path!(),
                    "::",
                    ::core::stringify!($owner),
                    "::",
                    ::core::stringify!($function)
                ),
                $roles,
            )
        }
    };
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn guarded() -> CallSite {
        crate::call_site!()
    }

    fn guarded_closure() -> CallSite {
        let resolve = || crate::call_site!();
        resolve()
    }

    struct Reports {
        exported: usize,
    }

    impl Reports {
        fn export(&mut self) -> CallSite {
            self.exported += 1;
            crate::call_site!()
        }
    }

    struct Queue<T>(Vec<T>);

    impl<T> Queue<T> {
        fn drain(&mut self) -> CallSite {
            self.0.clear();
            crate::call_site!()
        }
    }

    trait Archive {
        fn archive(&self) -> CallSite;
    }

    impl Archive for Queue<u8> {
        fn archive(&self) -> CallSite {
            crate::call_site!()
        }
    }

    #[test]
    fn call_site_resolves_enclosing_function() {
        assert_eq!(guarded().as_str(), concat!(module_path!(), "::guarded"));
    }

    #[test]
    fn call_site_skips_closure_segments() {
        assert_eq!(guarded_closure().as_str(), concat!(module_path!(), "::guarded_closure"));
    }

    #[test]
    fn call_site_of_inherent_method() {
        let mut reports = Reports { exported: 0 };

        assert_eq!(reports.export().as_str(), concat!(module_path!(), "::Reports::export"));
        assert_eq!(reports.exported, 1);
    }

    #[test]
    fn call_site_of_generic_impl_method_drops_arguments() {
        let mut queue = Queue(vec!["pending".to_owned()]);

        assert_eq!(queue.drain().as_str(), concat!(module_path!(), "::Queue::drain"));
        assert!(queue.0.is_empty());
    }

    #[test]
    fn call_site_of_trait_impl_method_uses_implementing_type() {
        assert_eq!(
            Queue(vec![1u8]).archive().as_str(),
            concat!(module_path!(), "::Queue::archive")
        );
    }

    #[test]
    fn from_nested_fn_without_parent_keeps_name() {
        assert_eq!(
            CallSite::from_nested_fn("call_site_anchor").as_str(),
            "call_site_anchor"
        );
    }

    #[test]
    fn from_nested_fn_normalizes_generic_and_qualified_paths() {
        let cases = [
            ("app::Queue<_>::drain::call_site_anchor", "app::Queue::drain"),
            ("<app::Ledger as app::Audit>::close::call_site_anchor", "app::Ledger::close"),
            (
                "<app::Cache<String> as app::Store<u8>>::put::{{closure}}::call_site_anchor",
                "app::Cache::put",
            ),
            ("app::Map<fn() -> u8, _>::get::call_site_anchor", "app::Map::get"),
        ];

        for (type_name, expected) in cases {
            assert_eq!(CallSite::from_nested_fn(type_name).as_str(), expected);
        }
    }

    #[test]
    fn display_is_the_path() {
        let site = CallSite::from_static("app::users::delete");
        assert_eq!(site.to_string(), "app::users::delete");
    }
}
