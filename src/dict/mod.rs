// This file is part of ratstack, a concatenative language kernel.
//
// SPDX-License-Identifier: GPL-3.0-or-later
//
// ratstack is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// ratstack is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with ratstack.  If not, see <http://www.gnu.org/licenses/>.

//! The dictionary: a name → word mapping with a dependency graph that
//! protects referenced words from deletion or redefinition.

use std::collections::BTreeMap;
use std::rc::Rc;

use log::debug;

use crate::error::{RatError, RatResult};
use crate::lang::{normalize_name, Token};

/// A builtin primitive. See [`crate::eval::builtins`] for the table of
/// names mapped to these.
pub type BuiltinFn = fn(&mut crate::eval::Evaluator) -> RatResult<()>;

/// A dictionary entry.
#[derive(Clone)]
pub enum Word {
    /// An evaluator primitive: not user-deletable, not user-redefinable.
    Builtin(BuiltinFn),

    /// A user-defined word: a captured token body plus bookkeeping.
    User(UserWord),
}

/// A word captured by `DEF`.
#[derive(Clone)]
pub struct UserWord {
    /// Shared so that every invocation of this word clones the `Rc`, not
    /// the token vector it points at.
    pub body: Rc<[Token]>,
    pub description: Option<String>,
    /// Normalized names this word's body depended on at `DEF` time, in
    /// the order they were first seen (duplicates collapsed).
    pub dependencies: Vec<String>,
}

/// Name → [`Word`] mapping with reference counting for protection.
///
/// Keyed by normalized (upper-case) name in a `BTreeMap` so that
/// `list_user` is sorted case-insensitively for free.
pub struct Dictionary {
    words: BTreeMap<String, Word>,
    ref_counts: BTreeMap<String, usize>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self {
            words: BTreeMap::new(),
            ref_counts: BTreeMap::new(),
        }
    }

    pub fn register_builtin(&mut self, name: &str, f: BuiltinFn) {
        self.words.insert(normalize_name(name), Word::Builtin(f));
    }

    pub fn lookup(&self, name: &str) -> Option<&Word> {
        self.words.get(&normalize_name(name))
    }

    fn ref_count(&self, normalized: &str) -> usize {
        self.ref_counts.get(normalized).copied().unwrap_or(0)
    }

    /// A word is protected if it is a Builtin, or if at least one User
    /// word's body depends on it.
    pub fn is_protected(&self, name: &str) -> bool {
        let normalized = normalize_name(name);
        match self.words.get(&normalized) {
            Some(Word::Builtin(_)) => true,
            Some(Word::User(_)) => self.ref_count(&normalized) > 0,
            None => false,
        }
    }

    /// Defines (or redefines) a user word, extracting dependencies
    /// syntactically from `body` at this moment.
    pub fn define(
        &mut self,
        name: &str,
        body: Vec<Token>,
        description: Option<String>,
    ) -> RatResult<()> {
        let normalized = normalize_name(name);

        match self.words.get(&normalized) {
            Some(Word::Builtin(_)) => return Err(RatError::IsBuiltin(normalized)),
            Some(Word::User(_)) if self.ref_count(&normalized) > 0 => {
                return Err(RatError::Protected(normalized));
            }
            _ => {}
        }

        let dependencies = self.extract_dependencies(&body);

        if let Some(Word::User(old)) = self.words.get(&normalized) {
            for dep in old.dependencies.clone() {
                self.decrement_ref(&dep);
            }
        }

        for dep in &dependencies {
            self.increment_ref(dep);
        }

        debug!(
            "DEF {normalized}: {} token(s), {} dependenc(y/ies)",
            body.len(),
            dependencies.len()
        );

        self.words.insert(
            normalized,
            Word::User(UserWord {
                body: Rc::from(body),
                description,
                dependencies,
            }),
        );

        Ok(())
    }

    /// Removes a user word. Fails for builtins and for protected words.
    pub fn remove(&mut self, name: &str) -> RatResult<()> {
        let normalized = normalize_name(name);

        match self.words.get(&normalized) {
            None => return Err(RatError::UnknownWord(normalized)),
            Some(Word::Builtin(_)) => return Err(RatError::IsBuiltin(normalized)),
            Some(Word::User(_)) if self.ref_count(&normalized) > 0 => {
                return Err(RatError::Protected(normalized));
            }
            Some(Word::User(_)) => {}
        }

        if let Some(Word::User(word)) = self.words.remove(&normalized) {
            for dep in word.dependencies {
                self.decrement_ref(&dep);
            }
            debug!("DEL {normalized}");
        }

        Ok(())
    }

    /// `(name, description, protected)` for every user word, sorted
    /// case-insensitively.
    pub fn list_user(&self) -> Vec<(String, Option<String>, bool)> {
        self.words
            .iter()
            .filter_map(|(name, word)| match word {
                Word::User(u) => Some((
                    name.clone(),
                    u.description.clone(),
                    self.ref_count(name) > 0,
                )),
                Word::Builtin(_) => None,
            })
            .collect()
    }

    /// Removes every user word, leaving builtins untouched.
    pub fn reset_user_words(&mut self) {
        self.words.retain(|_, w| matches!(w, Word::Builtin(_)));
        self.ref_counts.clear();
    }

    fn increment_ref(&mut self, normalized_dep: &str) {
        *self.ref_counts.entry(normalized_dep.to_string()).or_insert(0) += 1;
    }

    fn decrement_ref(&mut self, normalized_dep: &str) {
        if let Some(count) = self.ref_counts.get_mut(normalized_dep) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.ref_counts.remove(normalized_dep);
            }
        }
    }

    /// Every normalized identifier inside `body` (including inside
    /// nested `[ ... ]` literals) that resolves to a dictionary entry
    /// right now, each counted once regardless of repetition.
    fn extract_dependencies(&self, body: &[Token]) -> Vec<String> {
        let mut seen = Vec::new();
        for token in body {
            if let Token::Ident(name) = token {
                let normalized = normalize_name(name);
                if self.words.contains_key(&normalized) && !seen.contains(&normalized) {
                    seen.push(normalized);
                }
            }
        }
        seen
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut crate::eval::Evaluator) -> RatResult<()> {
        Ok(())
    }

    #[test]
    fn builtins_are_protected_and_not_deletable() {
        let mut dict = Dictionary::new();
        dict.register_builtin("DUP", noop);
        assert!(dict.is_protected("dup"));
        assert_eq!(dict.remove("DUP"), Err(RatError::IsBuiltin("DUP".into())));
    }

    #[test]
    fn define_is_case_insensitive() {
        let mut dict = Dictionary::new();
        dict.define("double", vec![], None).unwrap();
        assert!(dict.lookup("DOUBLE").is_some());
    }

    #[test]
    fn cannot_shadow_a_builtin() {
        let mut dict = Dictionary::new();
        dict.register_builtin("DUP", noop);
        let err = dict.define("dup", vec![], None).unwrap_err();
        assert_eq!(err, RatError::IsBuiltin("DUP".into()));
    }

    #[test]
    fn referenced_word_is_protected_from_deletion() {
        let mut dict = Dictionary::new();
        dict.define("DOUBLE", vec![Token::Ident("DUP".into())], None)
            .unwrap();
        dict.define(
            "QUAD",
            vec![Token::Ident("DOUBLE".into()), Token::Ident("DOUBLE".into())],
            None,
        )
        .unwrap();

        assert_eq!(dict.remove("DOUBLE"), Err(RatError::Protected("DOUBLE".into())));
    }

    #[test]
    fn referenced_word_cannot_be_redefined_either() {
        let mut dict = Dictionary::new();
        dict.define("DOUBLE", vec![], None).unwrap();
        dict.define("QUAD", vec![Token::Ident("DOUBLE".into())], None)
            .unwrap();

        assert_eq!(
            dict.define("DOUBLE", vec![], None),
            Err(RatError::Protected("DOUBLE".into()))
        );
    }

    #[test]
    fn removing_dependent_frees_the_dependency() {
        let mut dict = Dictionary::new();
        dict.define("DOUBLE", vec![], None).unwrap();
        dict.define("QUAD", vec![Token::Ident("DOUBLE".into())], None)
            .unwrap();

        dict.remove("QUAD").unwrap();
        assert!(dict.remove("DOUBLE").is_ok());
    }

    #[test]
    fn redefining_drops_old_dependencies_first() {
        let mut dict = Dictionary::new();
        dict.define("A", vec![], None).unwrap();
        dict.define("B", vec![Token::Ident("A".into())], None).unwrap();

        // B no longer depends on A.
        dict.define("B", vec![], None).unwrap();

        assert!(dict.remove("A").is_ok());
    }

    #[test]
    fn dependencies_nested_in_vector_literal_still_count() {
        let mut dict = Dictionary::new();
        dict.define("HELPER", vec![], None).unwrap();
        dict.define(
            "OUTER",
            vec![
                Token::LBracket,
                Token::Ident("HELPER".into()),
                Token::RBracket,
            ],
            None,
        )
        .unwrap();

        assert_eq!(dict.remove("HELPER"), Err(RatError::Protected("HELPER".into())));
    }

    #[test]
    fn list_user_is_sorted_case_insensitively() {
        let mut dict = Dictionary::new();
        dict.define("banana", vec![], None).unwrap();
        dict.define("Apple", vec![], None).unwrap();
        let names: Vec<String> = dict.list_user().into_iter().map(|(n, _, _)| n).collect();
        assert_eq!(names, vec!["APPLE".to_string(), "BANANA".to_string()]);
    }

    #[test]
    fn reset_user_words_keeps_builtins() {
        let mut dict = Dictionary::new();
        dict.register_builtin("DUP", noop);
        dict.define("DOUBLE", vec![], None).unwrap();
        dict.reset_user_words();
        assert!(dict.lookup("DUP").is_some());
        assert!(dict.lookup("DOUBLE").is_none());
    }
}
