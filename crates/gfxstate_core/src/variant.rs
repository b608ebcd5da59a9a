//! Shader Variant Records
//!
//! A [`VariantRecord`] names one compiled shader program: the shader, the
//! pass inside it and the set of enabled keywords.
//!
//! Keywords are held in a [`KeywordSet`], which keeps its interned symbols
//! sorted by keyword text and free of duplicates. Two sets built from the same
//! keywords in a different order are therefore structurally equal, and the
//! derived `Hash`/`Eq` give set semantics without any extra work at lookup
//! time.

use std::fmt;

use smallvec::SmallVec;

use crate::interner::{self, Symbol};

/// Opaque handle of a shader, identified by its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(Symbol);

impl ShaderId {
    #[inline]
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(interner::intern(name))
    }

    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        interner::resolve(self.0)
    }
}

impl fmt::Display for ShaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque handle of a pass inside a shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PassId {
    pub sub_shader_index: u32,
    pub pass_index: u32,
}

impl PassId {
    #[inline]
    #[must_use]
    pub const fn new(sub_shader_index: u32, pass_index: u32) -> Self {
        Self {
            sub_shader_index,
            pass_index,
        }
    }
}

impl fmt::Display for PassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.sub_shader_index, self.pass_index)
    }
}

// ─── KeywordSet ───────────────────────────────────────────────────────────────

/// Canonical, de-duplicated set of shader keywords.
///
/// # Performance
///
/// - Insertion: O(n) (binary search + shift); keyword sets are small
/// - Comparison / hashing: integer symbols only
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeywordSet {
    keywords: SmallVec<[Symbol; 8]>,
}

impl KeywordSet {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            keywords: SmallVec::new(),
        }
    }

    /// Inserts a keyword, keeping the set sorted by keyword text.
    ///
    /// Returns `false` if the keyword was already present.
    pub fn insert(&mut self, keyword: &str) -> bool {
        match self
            .keywords
            .binary_search_by(|sym| interner::resolve(*sym).cmp(keyword))
        {
            Ok(_) => false,
            Err(idx) => {
                self.keywords.insert(idx, interner::intern(keyword));
                true
            }
        }
    }

    #[must_use]
    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords
            .binary_search_by(|sym| interner::resolve(*sym).cmp(keyword))
            .is_ok()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Keywords in canonical (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.keywords.iter().map(|sym| interner::resolve(*sym))
    }
}

impl<S: AsRef<str>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = KeywordSet::new();
        for keyword in iter {
            set.insert(keyword.as_ref());
        }
        set
    }
}

impl fmt::Display for KeywordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("<no keywords>");
        }
        for (i, keyword) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(keyword)?;
        }
        Ok(())
    }
}

// ─── VariantRecord ────────────────────────────────────────────────────────────

/// One shader + pass + keyword-set combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantRecord {
    pub shader: ShaderId,
    pub pass: PassId,
    pub keywords: KeywordSet,
}

impl VariantRecord {
    #[must_use]
    pub fn new<S: AsRef<str>>(
        shader: &str,
        pass: PassId,
        keywords: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            shader: ShaderId::new(shader),
            pass,
            keywords: keywords.into_iter().collect(),
        }
    }
}

impl fmt::Display for VariantRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pass {} [{}]", self.shader, self.pass, self.keywords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_order_is_irrelevant() {
        let a = VariantRecord::new("Lit", PassId::new(0, 1), ["_FOG", "_SHADOWS", "_ALPHATEST"]);
        let b = VariantRecord::new("Lit", PassId::new(0, 1), ["_ALPHATEST", "_FOG", "_SHADOWS"]);
        assert_eq!(a, b);
        assert_eq!(
            a.keywords.iter().collect::<Vec<_>>(),
            ["_ALPHATEST", "_FOG", "_SHADOWS"]
        );
    }

    #[test]
    fn test_duplicate_keywords_collapse() {
        let set: KeywordSet = ["_FOG", "_FOG", "_NORMALMAP"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains("_FOG"));
        assert!(!set.contains("_EMISSION"));
    }

    #[test]
    fn test_pass_and_shader_distinguish_variants() {
        let base = VariantRecord::new("Lit", PassId::new(0, 0), ["_FOG"]);
        let other_pass = VariantRecord::new("Lit", PassId::new(0, 1), ["_FOG"]);
        let other_shader = VariantRecord::new("Unlit", PassId::new(0, 0), ["_FOG"]);
        assert_ne!(base, other_pass);
        assert_ne!(base, other_shader);
    }
}
