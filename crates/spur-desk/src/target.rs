//! Turning an investigation topic into a clue to pursue.
//!
//! A topic is either a list of search tags separated by `/` (a leading `-`
//! excludes a tag) or `clue:<name>` for "something related to a clue I
//! already know". Candidates are investigable, not placeholders, and not
//! yet known to the investigator. Rarely found clues are favored.

use std::collections::BTreeSet;

use rand::rngs::StdRng;

use spur_core::clue::PLACEHOLDER_PREFIX;
use spur_core::{CharacterId, Clue, ClueId, Investigation, LoreStore, SearchTagId};
use spur_mechanics::WeightedPicker;

use crate::error::{DeskError, DeskResult};

/// Prefix that marks a topic as "related to this clue".
pub const CLUE_TOPIC_PREFIX: &str = "clue:";
/// Rating given to a placeholder clue.
pub const PLACEHOLDER_RATING: u32 = 30;

/// A parsed topic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicSearch {
    /// Tags every candidate must carry, in the order given.
    pub tags: Vec<SearchTagId>,
    /// Tags no candidate may carry.
    pub omit: Vec<SearchTagId>,
    /// A known clue whose neighbors are wanted.
    pub source_clue: Option<ClueId>,
}

impl TopicSearch {
    /// Parse `text` for `character`.
    ///
    /// Tags are matched by name (ignoring case) or ID prefix. A source clue
    /// must be one the character knows.
    pub fn parse(store: &LoreStore, character: CharacterId, text: &str) -> DeskResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DeskError::invalid(
                "You must include a tag or clue to investigate.",
            ));
        }
        let mut search = Self::default();
        let first = text.split('/').next().unwrap_or_default();
        if first.to_lowercase().starts_with(CLUE_TOPIC_PREFIX) {
            let name = first.get(CLUE_TOPIC_PREFIX.len()..).unwrap_or_default().trim();
            let clue = store
                .resolve_clue(name)
                .ok()
                .filter(|id| store.knows_clue(character, *id))
                .ok_or_else(|| DeskError::invalid(format!("No Clue found using '{name}'.")))?;
            search.source_clue = Some(clue);
            return Ok(search);
        }
        for part in text.split('/') {
            let part = part.trim();
            let (omit, name) = match part.strip_prefix('-') {
                Some(rest) => (true, rest.trim()),
                None => (false, part),
            };
            let tag = resolve_tag(store, name).ok_or_else(|| {
                DeskError::invalid(format!("No SearchTag found using '{name}'."))
            })?;
            if omit {
                search.omit.push(tag);
            } else {
                search.tags.push(tag);
            }
        }
        if search.tags.is_empty() {
            return Err(DeskError::invalid(
                "You must include a tag or clue to investigate, not just tags you want to omit.",
            ));
        }
        Ok(search)
    }

    /// Total tags named, required and omitted.
    pub fn tag_count(&self) -> usize {
        self.tags.len() + self.omit.len()
    }

    /// `foo; zep; -bar`, or the source clue's name.
    pub fn describe(&self, store: &LoreStore) -> String {
        if let Some(clue) = self.source_clue {
            return store
                .get_clue(clue)
                .map(|c| c.name.clone())
                .unwrap_or_default();
        }
        let names = |ids: &[SearchTagId], prefix: &str| -> Vec<String> {
            ids.iter()
                .filter_map(|id| store.get_tag(*id))
                .map(|t| format!("{prefix}{}", t.name))
                .collect()
        };
        let mut parts = names(&self.tags, "");
        parts.extend(names(&self.omit, "-"));
        parts.join("; ")
    }
}

fn resolve_tag(store: &LoreStore, name: &str) -> Option<SearchTagId> {
    if let Some(tag) = store.find_tag(name) {
        return Some(tag.id);
    }
    let mut matches = store.tags().into_iter().filter(|t| t.id.matches_prefix(name));
    match (matches.next(), matches.next()) {
        (Some(tag), None) => Some(tag.id),
        _ => None,
    }
}

/// Weight of a clue in the rarity pick: the least discovered candidate
/// weighs `max + 1`, the most discovered weighs 1.
pub fn rarity_weight(max_discoveries: usize, own_discoveries: usize) -> u32 {
    let weight = max_discoveries.saturating_sub(own_discoveries).saturating_add(1);
    u32::try_from(weight).unwrap_or(u32::MAX)
}

fn pick_rare(
    store: &LoreStore,
    candidates: &[&Clue],
    bonus: impl Fn(&Clue) -> usize,
    rng: &mut StdRng,
) -> Option<ClueId> {
    let counts: Vec<usize> = candidates
        .iter()
        .map(|c| store.discovery_count(c.id))
        .collect();
    let max = counts.iter().copied().max()?;
    candidates
        .iter()
        .zip(counts)
        .map(|(clue, own)| {
            let extra = u32::try_from(bonus(clue)).unwrap_or(u32::MAX);
            (clue.id, rarity_weight(max, own).saturating_add(extra))
        })
        .collect::<WeightedPicker<ClueId>>()
        .into_pick(rng)
}

/// Pick a clue for `character` matching `search`, or `None` if nothing does.
///
/// With a source clue, clues sharing a revelation with it are preferred and
/// weighted up by the tags they share with it. If none exist, any clue
/// sharing a tag with the source will do.
pub fn pick_clue(
    store: &LoreStore,
    character: CharacterId,
    search: &TopicSearch,
    rng: &mut StdRng,
) -> Option<ClueId> {
    let base = || {
        store
            .query()
            .investigable()
            .skip_placeholders()
            .unknown_to(character)
    };
    if let Some(source_id) = search.source_clue {
        let source = store.get_clue(source_id)?;
        let revelations = store.revelations_for_clue(source_id);
        let related = base()
            .within(store.clues_for_revelations(&revelations))
            .execute();
        if !related.is_empty() {
            return pick_rare(store, &related, |c| c.tag_overlap(&source.search_tags), rng);
        }
        let by_tag = base().any_tag_of(source.search_tags.clone()).execute();
        return pick_rare(store, &by_tag, |_| 0, rng);
    }
    let exact = base()
        .require_tags(search.tags.iter().copied())
        .omit_tags(search.omit.iter().copied())
        .execute();
    pick_rare(store, &exact, |_| 0, rng)
}

/// Choose a target for an existing investigation from its topic.
///
/// A topic that no longer parses (a tag was renamed, a clue forgotten) falls
/// back to any tag whose name contains one of the topic's words.
pub fn find_target(
    store: &LoreStore,
    investigation: &Investigation,
    rng: &mut StdRng,
) -> Option<ClueId> {
    match TopicSearch::parse(store, investigation.character, &investigation.topic) {
        Ok(search) => pick_clue(store, investigation.character, &search, rng),
        Err(_) => {
            let tags: BTreeSet<SearchTagId> = investigation
                .topic
                .split(|c: char| c.is_whitespace() || c == '/')
                .flat_map(|word| store.tags_containing(word.trim_start_matches('-')))
                .collect();
            if tags.is_empty() {
                return None;
            }
            let loose = store
                .query()
                .investigable()
                .skip_placeholders()
                .unknown_to(investigation.character)
                .any_tag_of(tags)
                .execute();
            pick_rare(store, &loose, |_| 0, rng)
        }
    }
}

/// The stub clue written when a topic matches nothing.
///
/// It carries the topic's tags (or the source clue's tags) so staff know
/// what to write, and it is investigable so the investigation can find it.
pub fn placeholder_clue(store: &LoreStore, search: &TopicSearch, investigation: &Investigation) -> Clue {
    let mut clue = Clue::new(
        format!(
            "{PLACEHOLDER_PREFIX} for Investigation #{}",
            investigation.id
        ),
        PLACEHOLDER_RATING,
    )
    .investigable(true);
    clue.author = Some(investigation.character);
    if let Some(source) = search.source_clue.and_then(|id| store.get_clue(id)) {
        clue.gm_notes = format!(
            "Trying to find things related to Clue #{}: {}",
            source.id, source.name
        );
        clue.search_tags = source.search_tags.clone();
    } else {
        let added: BTreeSet<SearchTagId> = search.tags.iter().copied().collect();
        let omitted: BTreeSet<SearchTagId> = search.omit.iter().copied().collect();
        let omitted: Vec<String> = store
            .tag_names(&omitted)
            .into_iter()
            .map(|n| format!("-{n}"))
            .collect();
        clue.gm_notes = format!(
            "Added tags: {}\nExclude tags: {}",
            store.tag_names(&added).join(", "),
            omitted.join(", ")
        );
        clue.search_tags = added;
    }
    clue
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use spur_core::{
        Character, ClueDiscovery, ClueForRevelation, DiscoveryMethod, Revelation, SearchTag,
    };

    struct World {
        store: LoreStore,
        mira: CharacterId,
        sewers: SearchTagId,
        rats: SearchTagId,
        cult: SearchTagId,
    }

    fn world() -> World {
        let mut store = LoreStore::new();
        let mira = store.add_character(Character::new("Mira")).unwrap();
        let sewers = store.add_tag(SearchTag::new("sewers")).unwrap();
        let rats = store.add_tag(SearchTag::new("rats")).unwrap();
        let cult = store.add_tag(SearchTag::new("cult")).unwrap();
        World {
            store,
            mira,
            sewers,
            rats,
            cult,
        }
    }

    fn add_clue(store: &mut LoreStore, name: &str, tags: &[SearchTagId]) -> ClueId {
        let mut clue = Clue::new(name, 20).investigable(true);
        for tag in tags {
            clue = clue.with_tag(*tag);
        }
        store.add_clue(clue).unwrap()
    }

    #[test]
    fn parse_tags_and_omissions() {
        let w = world();
        let search = TopicSearch::parse(&w.store, w.mira, "Sewers / -cult/rats").unwrap();
        assert_eq!(search.tags, vec![w.sewers, w.rats]);
        assert_eq!(search.omit, vec![w.cult]);
        assert_eq!(search.tag_count(), 3);
        assert_eq!(search.describe(&w.store), "sewers; rats; -cult");
    }

    #[test]
    fn parse_rejects_unknown_and_omit_only() {
        let w = world();
        let err = TopicSearch::parse(&w.store, w.mira, "sewers/squeeb").unwrap_err();
        assert_eq!(err.to_string(), "No SearchTag found using 'squeeb'.");
        let err = TopicSearch::parse(&w.store, w.mira, "-cult").unwrap_err();
        assert!(err.to_string().ends_with("not just tags you want to omit."));
        let err = TopicSearch::parse(&w.store, w.mira, "  ").unwrap_err();
        assert_eq!(err.to_string(), "You must include a tag or clue to investigate.");
    }

    #[test]
    fn clue_topic_must_be_known() {
        let mut w = world();
        let well = add_clue(&mut w.store, "Old Well", &[w.sewers]);
        let err = TopicSearch::parse(&w.store, w.mira, "clue: old well").unwrap_err();
        assert_eq!(err.to_string(), "No Clue found using 'old well'.");
        w.store
            .add_clue_discovery(ClueDiscovery::new(well, w.mira, DiscoveryMethod::StaffGrant))
            .unwrap();
        let search = TopicSearch::parse(&w.store, w.mira, "Clue: old well").unwrap();
        assert_eq!(search.source_clue, Some(well));
        assert_eq!(search.describe(&w.store), "Old Well");
    }

    #[test]
    fn rarity_weight_favors_undiscovered() {
        assert_eq!(rarity_weight(4, 0), 5);
        assert_eq!(rarity_weight(4, 4), 1);
        assert_eq!(rarity_weight(0, 0), 1);
    }

    #[test]
    fn pick_requires_all_tags_and_skips_omitted() {
        let mut w = world();
        let both = add_clue(&mut w.store, "Rat King", &[w.sewers, w.rats]);
        add_clue(&mut w.store, "Damp Tunnel", &[w.sewers]);
        add_clue(&mut w.store, "Rat Cult", &[w.sewers, w.rats, w.cult]);
        let search = TopicSearch {
            tags: vec![w.sewers, w.rats],
            omit: vec![w.cult],
            source_clue: None,
        };
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            assert_eq!(pick_clue(&w.store, w.mira, &search, &mut rng), Some(both));
        }
    }

    #[test]
    fn pick_skips_known_placeholder_and_closed_clues() {
        let mut w = world();
        let known = add_clue(&mut w.store, "Known", &[w.rats]);
        w.store
            .add_clue_discovery(ClueDiscovery::new(known, w.mira, DiscoveryMethod::StaffGrant))
            .unwrap();
        add_clue(&mut w.store, "PLACEHOLDER for Investigation #1", &[w.rats]);
        w.store
            .add_clue(Clue::new("Closed", 10).with_tag(w.rats))
            .unwrap();
        let search = TopicSearch {
            tags: vec![w.rats],
            ..TopicSearch::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_clue(&w.store, w.mira, &search, &mut rng), None);
    }

    #[test]
    fn source_clue_prefers_revelation_siblings() {
        let mut w = world();
        let source = add_clue(&mut w.store, "Old Well", &[w.sewers]);
        let sibling = add_clue(&mut w.store, "Drowned Bell", &[w.cult]);
        add_clue(&mut w.store, "Damp Tunnel", &[w.sewers]);
        let rev = w.store.add_revelation(Revelation::new("Drowned King", 40)).unwrap();
        w.store.link_clue(ClueForRevelation::new(source, rev)).unwrap();
        w.store.link_clue(ClueForRevelation::new(sibling, rev)).unwrap();
        w.store
            .add_clue_discovery(ClueDiscovery::new(source, w.mira, DiscoveryMethod::StaffGrant))
            .unwrap();
        let search = TopicSearch {
            source_clue: Some(source),
            ..TopicSearch::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(pick_clue(&w.store, w.mira, &search, &mut rng), Some(sibling));
    }

    #[test]
    fn source_clue_falls_back_to_shared_tags() {
        let mut w = world();
        let source = add_clue(&mut w.store, "Old Well", &[w.sewers]);
        let tunnel = add_clue(&mut w.store, "Damp Tunnel", &[w.sewers]);
        add_clue(&mut w.store, "Rat Cult", &[w.cult]);
        w.store
            .add_clue_discovery(ClueDiscovery::new(source, w.mira, DiscoveryMethod::StaffGrant))
            .unwrap();
        let search = TopicSearch {
            source_clue: Some(source),
            ..TopicSearch::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(pick_clue(&w.store, w.mira, &search, &mut rng), Some(tunnel));
    }

    #[test]
    fn find_target_falls_back_to_tag_words() {
        let mut w = world();
        let cellar = add_clue(&mut w.store, "Rat Cellar", &[w.rats]);
        let inv = Investigation::new(w.mira, "where do the rats go");
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(find_target(&w.store, &inv, &mut rng), Some(cellar));
        let nothing = Investigation::new(w.mira, "zzz");
        assert_eq!(find_target(&w.store, &nothing, &mut rng), None);
    }

    #[test]
    fn placeholder_lists_tags_for_staff() {
        let w = world();
        let search = TopicSearch {
            tags: vec![w.sewers, w.rats],
            omit: vec![w.cult],
            source_clue: None,
        };
        let inv = Investigation::new(w.mira, "sewers/rats/-cult");
        let clue = placeholder_clue(&w.store, &search, &inv);
        assert!(clue.is_placeholder());
        assert!(clue.allow_investigation);
        assert_eq!(clue.rating, PLACEHOLDER_RATING);
        assert_eq!(clue.gm_notes, "Added tags: rats, sewers\nExclude tags: -cult");
        assert_eq!(clue.search_tags.len(), 2);
    }
}
