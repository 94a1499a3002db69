/// Expands to the path of the enclosing function, e.g. `app::Greeter::hello`.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        let name = type_name_of(f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}

/// Expands to the [CallSite](crate::CallSite) of the macro invocation.
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite {
            file: ::core::file!(),
            line: ::core::line!(),
            column: ::core::column!(),
            function: $crate::__function_name!(),
            manifest_dir: ::core::option_env!("CARGO_MANIFEST_DIR"),
        }
    };
}

/// Prints the value of an expression together with the location of the call
/// and returns the value, similar to `dbg!`.
///
/// - `pd!()` prints only the location.
/// - `pd!(value)` prints and returns `value`.
/// - `pd!(value; options)` uses the given [CallOptions](crate::CallOptions) for this call.
/// - `pd!(a, b)` prints the values as one tuple, counted as a single run, and returns the tuple.
///
/// Whether anything is printed depends on the `run_at` option, the value is
/// returned in any case.
#[macro_export]
macro_rules! pd {
    () => {{
        $crate::__print(&$crate::call_site!(), "", ::core::option::Option::None, &$crate::CallOptions::new());
    }};
    ($value:expr; $options:expr $(,)?) => {
        match $value {
            value => {
                $crate::__print(
                    &$crate::call_site!(),
                    ::core::stringify!($value),
                    ::core::option::Option::Some(&value as &dyn ::core::fmt::Debug),
                    &$options,
                );
                value
            }
        }
    };
    ($value:expr $(,)?) => {
        $crate::pd!($value; $crate::CallOptions::new())
    };
    ($($value:expr),+ $(,)?) => {
        match ($($value),+,) {
            values => {
                $crate::__print(
                    &$crate::call_site!(),
                    ::core::stringify!($($value),+),
                    ::core::option::Option::Some(&values as &dyn ::core::fmt::Debug),
                    &$crate::CallOptions::new(),
                );
                values
            }
        }
    };
}

/// Same as [pd!] but returns the print out as a `String` instead of printing
/// it. The string is empty when `run_at` skips the call.
#[macro_export]
macro_rules! pdi {
    () => {
        $crate::__inspect(&$crate::call_site!(), "", ::core::option::Option::None, &$crate::CallOptions::new())
            .unwrap_or_default()
    };
    ($value:expr; $options:expr $(,)?) => {
        $crate::__inspect(
            &$crate::call_site!(),
            ::core::stringify!($value),
            ::core::option::Option::Some(&$value as &dyn ::core::fmt::Debug),
            &$options,
        )
        .unwrap_or_default()
    };
    ($value:expr $(,)?) => {
        $crate::pdi!($value; $crate::CallOptions::new())
    };
    ($($value:expr),+ $(,)?) => {
        $crate::__inspect(
            &$crate::call_site!(),
            ::core::stringify!($($value),+),
            ::core::option::Option::Some(&($($value),+,) as &dyn ::core::fmt::Debug),
            &$crate::CallOptions::new(),
        )
        .unwrap_or_default()
    };
}
