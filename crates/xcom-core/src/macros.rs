//! Macro utilitaria para declarar constructs con poco boilerplate.
//!
//! Exportada en la raíz del crate:
//!   use xcom_core::construct;

/// Declara un struct con derives y su impl de `ConstructSpec`.
///
/// Formas soportadas:
/// - construct!(Name { field1: Ty1, field2: Ty2 } tag: "Name");
/// - construct!(Name { field1: Ty1 }); // tag = stringify!(Name)
#[macro_export]
macro_rules! construct {
    ($name:ident { $($fname:ident : $fty:ty),+ $(,)? } tag: $tag:expr) => {
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $name { $(pub $fname: $fty,)+ }
        impl $crate::model::ConstructSpec for $name {
            const TYPE_TAG: &'static str = $tag;
        }
    };
    ($name:ident { $($fname:ident : $fty:ty),+ $(,)? }) => {
        $crate::construct!($name { $($fname : $fty),+ } tag: stringify!($name));
    };
}
