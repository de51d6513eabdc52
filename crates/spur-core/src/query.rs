use std::collections::BTreeSet;

use crate::clue::Clue;
use crate::ids::{CharacterId, ClueId, SearchTagId};
use crate::store::LoreStore;

/// A builder for filtering clues in a store.
pub struct ClueQuery<'s> {
    store: &'s LoreStore,
    required_tags: BTreeSet<SearchTagId>,
    omitted_tags: BTreeSet<SearchTagId>,
    any_tags: Option<BTreeSet<SearchTagId>>,
    within: Option<BTreeSet<ClueId>>,
    unknown_to: Option<CharacterId>,
    known_to: Option<CharacterId>,
    investigable_only: bool,
    skip_placeholders: bool,
    name_contains: Option<String>,
    limit: Option<usize>,
}

impl<'s> ClueQuery<'s> {
    /// Start an unfiltered query.
    pub fn new(store: &'s LoreStore) -> Self {
        Self {
            store,
            required_tags: BTreeSet::new(),
            omitted_tags: BTreeSet::new(),
            any_tags: None,
            within: None,
            unknown_to: None,
            known_to: None,
            investigable_only: false,
            skip_placeholders: false,
            name_contains: None,
            limit: None,
        }
    }

    /// Require a tag. Every required tag must be present.
    pub fn require_tag(mut self, tag: SearchTagId) -> Self {
        self.required_tags.insert(tag);
        self
    }

    /// Require all of the given tags.
    pub fn require_tags(mut self, tags: impl IntoIterator<Item = SearchTagId>) -> Self {
        self.required_tags.extend(tags);
        self
    }

    /// Exclude clues carrying any of the given tags.
    pub fn omit_tags(mut self, tags: impl IntoIterator<Item = SearchTagId>) -> Self {
        self.omitted_tags.extend(tags);
        self
    }

    /// Keep clues carrying at least one of the given tags.
    pub fn any_tag_of(mut self, tags: BTreeSet<SearchTagId>) -> Self {
        self.any_tags = Some(tags);
        self
    }

    /// Restrict to the given clue IDs.
    pub fn within(mut self, clues: BTreeSet<ClueId>) -> Self {
        self.within = Some(clues);
        self
    }

    /// Exclude clues the character already knows.
    pub fn unknown_to(mut self, character: CharacterId) -> Self {
        self.unknown_to = Some(character);
        self
    }

    /// Keep only clues the character knows.
    pub fn known_to(mut self, character: CharacterId) -> Self {
        self.known_to = Some(character);
        self
    }

    /// Keep only clues open to investigation.
    pub fn investigable(mut self) -> Self {
        self.investigable_only = true;
        self
    }

    /// Exclude placeholder clues.
    pub fn skip_placeholders(mut self) -> Self {
        self.skip_placeholders = true;
        self
    }

    /// Keep clues whose name contains the substring, ignoring case.
    pub fn name_contains(mut self, s: impl Into<String>) -> Self {
        self.name_contains = Some(s.into().to_lowercase());
        self
    }

    /// Limit the number of results.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Execute the query. Results are sorted by name.
    pub fn execute(self) -> Vec<&'s Clue> {
        let results = self
            .store
            .clues()
            .into_iter()
            .filter(|c| self.matches(c));
        match self.limit {
            Some(limit) => results.take(limit).collect(),
            None => results.collect(),
        }
    }

    /// Count matching clues without collecting them.
    pub fn count(self) -> usize {
        self.store
            .clues()
            .into_iter()
            .filter(|c| self.matches(c))
            .count()
    }

    fn matches(&self, clue: &Clue) -> bool {
        if self.investigable_only && !clue.allow_investigation {
            return false;
        }
        if self.skip_placeholders && clue.is_placeholder() {
            return false;
        }
        if let Some(ref ids) = self.within
            && !ids.contains(&clue.id)
        {
            return false;
        }
        if !self.required_tags.is_subset(&clue.search_tags) {
            return false;
        }
        if !self.omitted_tags.is_disjoint(&clue.search_tags) {
            return false;
        }
        if let Some(ref tags) = self.any_tags
            && tags.is_disjoint(&clue.search_tags)
        {
            return false;
        }
        if let Some(character) = self.unknown_to
            && self.store.knows_clue(character, clue.id)
        {
            return false;
        }
        if let Some(character) = self.known_to
            && !self.store.knows_clue(character, clue.id)
        {
            return false;
        }
        if let Some(ref s) = self.name_contains
            && !clue.name.to_lowercase().contains(s)
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Character;
    use crate::discovery::{ClueDiscovery, DiscoveryMethod};
    use crate::tag::SearchTag;

    fn store() -> (LoreStore, SearchTagId, SearchTagId, CharacterId) {
        let mut store = LoreStore::new();
        let sewers = store.add_tag(SearchTag::new("sewers")).unwrap();
        let rats = store.add_tag(SearchTag::new("rats")).unwrap();
        let mira = store.add_character(Character::new("Mira")).unwrap();
        store
            .add_clue(
                Clue::new("Rat King", 20)
                    .investigable(true)
                    .with_tag(sewers)
                    .with_tag(rats),
            )
            .unwrap();
        store
            .add_clue(Clue::new("Flooded Tunnel", 10).investigable(true).with_tag(sewers))
            .unwrap();
        store
            .add_clue(Clue::new("Sealed Grate", 10).with_tag(sewers))
            .unwrap();
        store
            .add_clue(Clue::new("PLACEHOLDER for Investigation #1", 30).investigable(true).with_tag(sewers))
            .unwrap();
        (store, sewers, rats, mira)
    }

    fn names(clues: Vec<&Clue>) -> Vec<&str> {
        clues.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn required_tags_all_match() {
        let (store, sewers, rats, _) = store();
        let results = store.query().require_tag(sewers).require_tag(rats).execute();
        assert_eq!(names(results), vec!["Rat King"]);
    }

    #[test]
    fn omitted_tags_exclude() {
        let (store, sewers, rats, _) = store();
        let results = store
            .query()
            .require_tag(sewers)
            .omit_tags([rats])
            .investigable()
            .skip_placeholders()
            .execute();
        assert_eq!(names(results), vec!["Flooded Tunnel"]);
    }

    #[test]
    fn unknown_to_excludes_known() {
        let (mut store, sewers, _, mira) = store();
        let tunnel = store.resolve_clue("Flooded Tunnel").unwrap();
        store
            .add_clue_discovery(ClueDiscovery::new(tunnel, mira, DiscoveryMethod::StaffGrant))
            .unwrap();
        let unknown = store
            .query()
            .require_tag(sewers)
            .investigable()
            .skip_placeholders()
            .unknown_to(mira)
            .count();
        assert_eq!(unknown, 1);
        let known = store.query().known_to(mira).execute();
        assert_eq!(names(known), vec!["Flooded Tunnel"]);
    }

    #[test]
    fn limit_and_name_filter() {
        let (store, _, _, _) = store();
        assert_eq!(store.query().limit(2).execute().len(), 2);
        let results = store.query().name_contains("GRATE").execute();
        assert_eq!(names(results), vec!["Sealed Grate"]);
    }
}
