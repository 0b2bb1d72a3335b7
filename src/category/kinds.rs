// Copyright 2025 Cowboy AI, LLC.

//! Open-ended type tags for objects and morphisms
//!
//! Extractors for new languages introduce new tags, so each tag set is a
//! closed list of well-known values plus an `Other` fallback. Tags serialize
//! as their plain string form.

use std::fmt;

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

macro_rules! open_tag {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Any tag not in the well-known set
            Other(String),
        }

        impl $name {
            /// The tag's string form
            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $text, )+
                    $name::Other(text) => text,
                }
            }
        }

        impl From<&str> for $name {
            fn from(text: &str) -> Self {
                match text {
                    $( $text => $name::$variant, )+
                    other => $name::Other(other.to_string()),
                }
            }
        }

        impl From<String> for $name {
            fn from(text: String) -> Self {
                match $name::from(text.as_str()) {
                    $name::Other(_) => $name::Other(text),
                    known => known,
                }
            }
        }

        impl From<$name> for String {
            fn from(tag: $name) -> Self {
                match tag {
                    $name::Other(text) => text,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl JsonSchema for $name {
            fn schema_name() -> String {
                stringify!($name).to_string()
            }

            fn json_schema(gen: &mut SchemaGenerator) -> Schema {
                String::json_schema(gen)
            }
        }
    };
}

open_tag! {
    /// Kind of software entity an object models
    ObjectKind {
        /// A source file
        File => "file",
        /// A language module
        Module => "module",
        /// A package (aggregate of files)
        Package => "package",
        /// A class
        Class => "class",
        /// A struct type
        Struct => "struct",
        /// An interface or protocol
        Interface => "interface",
        /// A function or method
        Function => "function",
        /// A module referenced by an import but not analysed
        ImportedModule => "imported_module",
        /// Example or demo program
        Example => "example",
    }
}

open_tag! {
    /// Kind of relationship a morphism models
    MorphismKind {
        /// The identity arrow every object owns
        Identity => "identity",
        /// An import statement
        Import => "import",
        /// A generic dependency
        Dependency => "dependency",
        /// A call from one function to another
        FunctionCall => "function_call",
        /// Class inheritance
        Inheritance => "inheritance",
        /// A reference to another type
        TypeDependency => "type_dependency",
        /// Containment (a file defines a function)
        Defines => "defines",
        /// Result of composing two morphisms
        Composed => "composed",
        /// A decorator application
        Decorator => "decorator",
    }
}
