//! Identifier newtypes.
//!
//! Every object the recipe server hands out is identified by a positive
//! integer. Wrapping each kind in its own type keeps a keyword id from being
//! passed where a recipe id is expected.

/// Generates an id newtype over `u64` with `From`, `Display` and accessors.
///
/// # Usage
/// ```ignore
/// define_id!(RecipeId, "Identifier of a recipe.");
/// ```
macro_rules! define_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(u64);

        impl $name {
            /// Creates a new id.
            #[inline]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the raw id value.
            #[inline]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(RecipeId, "Identifier of a recipe.");
define_id!(KeywordId, "Identifier of a keyword.");
define_id!(BookId, "Identifier of a recipe book (collection).");
define_id!(FoodId, "Identifier of a food.");
