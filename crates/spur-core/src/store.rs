use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::character::Character;
use crate::clue::Clue;
use crate::discovery::{ClueDiscovery, RevelationDiscovery};
use crate::error::{LoreError, LoreResult};
use crate::ids::{CharacterId, ClueId, InvestigationId, RevelationId, SearchTagId};
use crate::investigation::{Investigation, InvestigationAssistant};
use crate::query::ClueQuery;
use crate::revelation::{ClueForRevelation, Revelation};
use crate::tag::SearchTag;

/// Owns every lore record and enforces their uniqueness rules.
///
/// Clues, revelations, and tags are shared by all characters. Discoveries
/// and investigations belong to a character and go away with it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoreStore {
    tags: HashMap<SearchTagId, SearchTag>,
    clues: HashMap<ClueId, Clue>,
    revelations: HashMap<RevelationId, Revelation>,
    clue_usage: Vec<ClueForRevelation>,
    characters: HashMap<CharacterId, Character>,
    clue_discoveries: HashMap<CharacterId, Vec<ClueDiscovery>>,
    revelation_discoveries: HashMap<CharacterId, Vec<RevelationDiscovery>>,
    investigations: HashMap<InvestigationId, Investigation>,
}

impl LoreStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Search tags
    // -----------------------------------------------------------------------

    /// Add a search tag. Names are unique, ignoring case.
    pub fn add_tag(&mut self, tag: SearchTag) -> LoreResult<SearchTagId> {
        if self.find_tag(&tag.name).is_some() {
            return Err(LoreError::DuplicateName(tag.name));
        }
        let id = tag.id;
        self.tags.insert(id, tag);
        Ok(id)
    }

    /// Get a tag by ID.
    pub fn get_tag(&self, id: SearchTagId) -> Option<&SearchTag> {
        self.tags.get(&id)
    }

    /// Find a tag by exact name, ignoring case.
    pub fn find_tag(&self, name: &str) -> Option<&SearchTag> {
        let name = name.trim().to_lowercase();
        self.tags.values().find(|t| t.name.to_lowercase() == name)
    }

    /// Tags whose name contains `word`, ignoring case.
    pub fn tags_containing(&self, word: &str) -> BTreeSet<SearchTagId> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return BTreeSet::new();
        }
        self.tags
            .values()
            .filter(|t| t.name.to_lowercase().contains(&word))
            .map(|t| t.id)
            .collect()
    }

    /// Sorted names for a set of tag IDs. Unknown IDs are skipped.
    pub fn tag_names(&self, ids: &BTreeSet<SearchTagId>) -> Vec<String> {
        let mut names: Vec<String> = ids
            .iter()
            .filter_map(|id| self.tags.get(id))
            .map(|t| t.name.clone())
            .collect();
        names.sort_by_key(|n| n.to_lowercase());
        names
    }

    /// All tags, sorted by name.
    pub fn tags(&self) -> Vec<&SearchTag> {
        let mut tags: Vec<&SearchTag> = self.tags.values().collect();
        tags.sort_by_key(|t| t.name.to_lowercase());
        tags
    }

    // -----------------------------------------------------------------------
    // Clues
    // -----------------------------------------------------------------------

    /// Add a clue. Its tags must already exist.
    pub fn add_clue(&mut self, clue: Clue) -> LoreResult<ClueId> {
        if let Some(missing) = clue.search_tags.iter().find(|t| !self.tags.contains_key(t)) {
            return Err(LoreError::SearchTagNotFound(*missing));
        }
        let id = clue.id;
        self.clues.insert(id, clue);
        Ok(id)
    }

    /// Get a clue by ID.
    pub fn get_clue(&self, id: ClueId) -> Option<&Clue> {
        self.clues.get(&id)
    }

    /// Get a mutable clue by ID.
    pub fn get_clue_mut(&mut self, id: ClueId) -> Option<&mut Clue> {
        self.clues.get_mut(&id)
    }

    /// Get a clue or fail with [`LoreError::ClueNotFound`].
    pub fn clue(&self, id: ClueId) -> LoreResult<&Clue> {
        self.clues.get(&id).ok_or(LoreError::ClueNotFound(id))
    }

    /// All clues, sorted by name then ID for deterministic iteration.
    pub fn clues(&self) -> Vec<&Clue> {
        let mut clues: Vec<&Clue> = self.clues.values().collect();
        clues.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        clues
    }

    /// Resolve a clue from an ID prefix or a case-insensitive name.
    pub fn resolve_clue(&self, needle: &str) -> LoreResult<ClueId> {
        resolve(
            needle,
            self.clues.values().map(|c| (c.id, c.name.as_str())),
            |id, prefix| id.matches_prefix(prefix),
        )
    }

    /// Start building a clue query.
    pub fn query(&self) -> ClueQuery<'_> {
        ClueQuery::new(self)
    }

    /// How many characters know the clue.
    pub fn discovery_count(&self, clue: ClueId) -> usize {
        self.clue_discoveries
            .values()
            .filter(|discos| discos.iter().any(|d| d.clue == clue))
            .count()
    }

    /// Average discovery count over investigable clues, 0.0 if there are none.
    pub fn average_investigable_discoveries(&self) -> f64 {
        let counts: Vec<usize> = self
            .clues
            .values()
            .filter(|c| c.allow_investigation)
            .map(|c| self.discovery_count(c.id))
            .collect();
        if counts.is_empty() {
            return 0.0;
        }
        counts.iter().sum::<usize>() as f64 / counts.len() as f64
    }

    // -----------------------------------------------------------------------
    // Revelations and clue usage
    // -----------------------------------------------------------------------

    /// Add a revelation.
    pub fn add_revelation(&mut self, revelation: Revelation) -> LoreResult<RevelationId> {
        let id = revelation.id;
        self.revelations.insert(id, revelation);
        Ok(id)
    }

    /// Get a revelation by ID.
    pub fn get_revelation(&self, id: RevelationId) -> Option<&Revelation> {
        self.revelations.get(&id)
    }

    /// All revelations, sorted by name.
    pub fn revelations(&self) -> Vec<&Revelation> {
        let mut revs: Vec<&Revelation> = self.revelations.values().collect();
        revs.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        revs
    }

    /// Resolve a revelation from an ID prefix or a case-insensitive name.
    pub fn resolve_revelation(&self, needle: &str) -> LoreResult<RevelationId> {
        resolve(
            needle,
            self.revelations.values().map(|r| (r.id, r.name.as_str())),
            |id, prefix| id.matches_prefix(prefix),
        )
    }

    /// Tie a clue to a revelation. Linking the same pair again replaces the usage.
    pub fn link_clue(&mut self, usage: ClueForRevelation) -> LoreResult<()> {
        if !self.clues.contains_key(&usage.clue) {
            return Err(LoreError::ClueNotFound(usage.clue));
        }
        if !self.revelations.contains_key(&usage.revelation) {
            return Err(LoreError::RevelationNotFound(usage.revelation));
        }
        self.clue_usage
            .retain(|u| !(u.clue == usage.clue && u.revelation == usage.revelation));
        self.clue_usage.push(usage);
        Ok(())
    }

    /// Usage records of a revelation.
    pub fn usage_for_revelation(&self, revelation: RevelationId) -> Vec<&ClueForRevelation> {
        self.clue_usage
            .iter()
            .filter(|u| u.revelation == revelation)
            .collect()
    }

    /// Revelations a clue contributes to.
    pub fn revelations_for_clue(&self, clue: ClueId) -> BTreeSet<RevelationId> {
        self.clue_usage
            .iter()
            .filter(|u| u.clue == clue)
            .map(|u| u.revelation)
            .collect()
    }

    /// Clues contributing to any of `revelations`.
    pub fn clues_for_revelations(&self, revelations: &BTreeSet<RevelationId>) -> BTreeSet<ClueId> {
        self.clue_usage
            .iter()
            .filter(|u| revelations.contains(&u.revelation))
            .map(|u| u.clue)
            .collect()
    }

    /// Summed rating of every clue tied to the revelation.
    pub fn total_clue_value(&self, revelation: RevelationId) -> u32 {
        self.usage_for_revelation(revelation)
            .iter()
            .filter_map(|u| self.clues.get(&u.clue))
            .map(|c| c.rating)
            .sum()
    }

    /// Summed rating of the tied clues the character knows.
    pub fn revelation_progress(&self, character: CharacterId, revelation: RevelationId) -> u32 {
        self.usage_for_revelation(revelation)
            .iter()
            .filter(|u| self.knows_clue(character, u.clue))
            .filter_map(|u| self.clues.get(&u.clue))
            .map(|c| c.rating)
            .sum()
    }

    /// Whether the character now meets the revelation's unlock condition.
    ///
    /// Every required clue must be known, and the known tied clues must be
    /// worth at least `required_clue_value`.
    pub fn can_discover_revelation(&self, character: CharacterId, revelation: RevelationId) -> bool {
        let Some(rev) = self.revelations.get(&revelation) else {
            return false;
        };
        let missing_required = self
            .usage_for_revelation(revelation)
            .iter()
            .any(|u| u.required_for_revelation && !self.knows_clue(character, u.clue));
        if missing_required {
            return false;
        }
        self.revelation_progress(character, revelation) >= rev.required_clue_value
    }

    // -----------------------------------------------------------------------
    // Characters
    // -----------------------------------------------------------------------

    /// Add a character. Names are unique, ignoring case.
    pub fn add_character(&mut self, character: Character) -> LoreResult<CharacterId> {
        if self.find_character(&character.name).is_some() {
            return Err(LoreError::DuplicateName(character.name));
        }
        let id = character.id;
        self.characters.insert(id, character);
        Ok(id)
    }

    /// Get a character by ID.
    pub fn get_character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(&id)
    }

    /// Get a mutable character by ID.
    pub fn get_character_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.get_mut(&id)
    }

    /// Get a character or fail with [`LoreError::CharacterNotFound`].
    pub fn character(&self, id: CharacterId) -> LoreResult<&Character> {
        self.characters
            .get(&id)
            .ok_or(LoreError::CharacterNotFound(id))
    }

    /// Mutable character or [`LoreError::CharacterNotFound`].
    pub fn character_mut(&mut self, id: CharacterId) -> LoreResult<&mut Character> {
        self.characters
            .get_mut(&id)
            .ok_or(LoreError::CharacterNotFound(id))
    }

    /// Find a character by name, ignoring case.
    pub fn find_character(&self, name: &str) -> Option<&Character> {
        let name = name.trim().to_lowercase();
        self.characters
            .values()
            .find(|c| c.name.to_lowercase() == name)
    }

    /// Display name of a character, or `"someone"` when unknown.
    pub fn character_name(&self, id: CharacterId) -> &str {
        self.characters
            .get(&id)
            .map(|c| c.name.as_str())
            .unwrap_or("someone")
    }

    /// All characters, sorted by name.
    pub fn characters(&self) -> Vec<&Character> {
        let mut chars: Vec<&Character> = self.characters.values().collect();
        chars.sort_by_key(|c| c.name.to_lowercase());
        chars
    }

    /// Remove a character along with their discoveries and investigations.
    pub fn remove_character(&mut self, id: CharacterId) -> LoreResult<Character> {
        let character = self
            .characters
            .remove(&id)
            .ok_or(LoreError::CharacterNotFound(id))?;
        self.clue_discoveries.remove(&id);
        self.revelation_discoveries.remove(&id);
        self.investigations.retain(|_, inv| inv.character != id);
        for inv in self.investigations.values_mut() {
            inv.assistants.retain(|a| a.character != id);
        }
        Ok(character)
    }

    // -----------------------------------------------------------------------
    // Clue discoveries
    // -----------------------------------------------------------------------

    /// Whether the character knows the clue.
    pub fn knows_clue(&self, character: CharacterId, clue: ClueId) -> bool {
        self.clue_discovery(character, clue).is_some()
    }

    /// The character's discovery of the clue, if any.
    pub fn clue_discovery(&self, character: CharacterId, clue: ClueId) -> Option<&ClueDiscovery> {
        self.clue_discoveries
            .get(&character)?
            .iter()
            .find(|d| d.clue == clue)
    }

    /// Mutable discovery record.
    pub fn clue_discovery_mut(
        &mut self,
        character: CharacterId,
        clue: ClueId,
    ) -> Option<&mut ClueDiscovery> {
        self.clue_discoveries
            .get_mut(&character)?
            .iter_mut()
            .find(|d| d.clue == clue)
    }

    /// Record a clue discovery. A second discovery of the same pair is rejected.
    pub fn add_clue_discovery(&mut self, discovery: ClueDiscovery) -> LoreResult<()> {
        if !self.characters.contains_key(&discovery.character) {
            return Err(LoreError::CharacterNotFound(discovery.character));
        }
        if !self.clues.contains_key(&discovery.clue) {
            return Err(LoreError::ClueNotFound(discovery.clue));
        }
        if self.knows_clue(discovery.character, discovery.clue) {
            return Err(LoreError::AlreadyDiscovered {
                clue: discovery.clue,
                character: discovery.character,
            });
        }
        self.clue_discoveries
            .entry(discovery.character)
            .or_default()
            .push(discovery);
        Ok(())
    }

    /// Every clue discovery of a character, oldest first.
    pub fn clue_discoveries_of(&self, character: CharacterId) -> &[ClueDiscovery] {
        self.clue_discoveries
            .get(&character)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// IDs of every clue the character knows.
    pub fn known_clues(&self, character: CharacterId) -> BTreeSet<ClueId> {
        self.clue_discoveries_of(character)
            .iter()
            .map(|d| d.clue)
            .collect()
    }

    /// Characters who learned `clue` because `sharer` shared it.
    pub fn shared_with(&self, sharer: CharacterId, clue: ClueId) -> Vec<CharacterId> {
        let mut ids: Vec<CharacterId> = self
            .clue_discoveries
            .values()
            .flatten()
            .filter(|d| d.clue == clue && d.revealed_by == Some(sharer))
            .map(|d| d.character)
            .collect();
        ids.sort();
        ids
    }

    // -----------------------------------------------------------------------
    // Revelation discoveries
    // -----------------------------------------------------------------------

    /// Whether the character knows the revelation.
    pub fn knows_revelation(&self, character: CharacterId, revelation: RevelationId) -> bool {
        self.revelation_discoveries
            .get(&character)
            .is_some_and(|discos| discos.iter().any(|d| d.revelation == revelation))
    }

    /// Record a revelation discovery. A second discovery of the same pair is rejected.
    pub fn add_revelation_discovery(&mut self, discovery: RevelationDiscovery) -> LoreResult<()> {
        if !self.characters.contains_key(&discovery.character) {
            return Err(LoreError::CharacterNotFound(discovery.character));
        }
        if !self.revelations.contains_key(&discovery.revelation) {
            return Err(LoreError::RevelationNotFound(discovery.revelation));
        }
        if self.knows_revelation(discovery.character, discovery.revelation) {
            return Err(LoreError::RevelationAlreadyDiscovered {
                revelation: discovery.revelation,
                character: discovery.character,
            });
        }
        self.revelation_discoveries
            .entry(discovery.character)
            .or_default()
            .push(discovery);
        Ok(())
    }

    /// Every revelation discovery of a character, oldest first.
    pub fn revelation_discoveries_of(&self, character: CharacterId) -> &[RevelationDiscovery] {
        self.revelation_discoveries
            .get(&character)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    // -----------------------------------------------------------------------
    // Investigations
    // -----------------------------------------------------------------------

    /// Add an investigation for an existing character.
    pub fn add_investigation(&mut self, investigation: Investigation) -> LoreResult<InvestigationId> {
        if !self.characters.contains_key(&investigation.character) {
            return Err(LoreError::CharacterNotFound(investigation.character));
        }
        let id = investigation.id;
        self.investigations.insert(id, investigation);
        Ok(id)
    }

    /// Get an investigation by ID.
    pub fn get_investigation(&self, id: InvestigationId) -> Option<&Investigation> {
        self.investigations.get(&id)
    }

    /// Get a mutable investigation by ID.
    pub fn get_investigation_mut(&mut self, id: InvestigationId) -> Option<&mut Investigation> {
        self.investigations.get_mut(&id)
    }

    /// Get an investigation or fail with [`LoreError::InvestigationNotFound`].
    pub fn investigation(&self, id: InvestigationId) -> LoreResult<&Investigation> {
        self.investigations
            .get(&id)
            .ok_or(LoreError::InvestigationNotFound(id))
    }

    /// Mutable investigation or [`LoreError::InvestigationNotFound`].
    pub fn investigation_mut(&mut self, id: InvestigationId) -> LoreResult<&mut Investigation> {
        self.investigations
            .get_mut(&id)
            .ok_or(LoreError::InvestigationNotFound(id))
    }

    /// Resolve an investigation from an ID prefix.
    pub fn resolve_investigation(&self, needle: &str) -> LoreResult<InvestigationId> {
        let matches: Vec<InvestigationId> = self
            .investigations
            .keys()
            .filter(|id| id.matches_prefix(needle))
            .copied()
            .collect();
        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(LoreError::NoMatch(needle.trim().to_string())),
            _ => Err(LoreError::Ambiguous(needle.trim().to_string())),
        }
    }

    /// All investigations, oldest first.
    pub fn investigations(&self) -> Vec<&Investigation> {
        let mut invs: Vec<&Investigation> = self.investigations.values().collect();
        invs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        invs
    }

    /// A character's investigations, oldest first.
    pub fn investigations_of(&self, character: CharacterId) -> Vec<&Investigation> {
        self.investigations()
            .into_iter()
            .filter(|inv| inv.character == character)
            .collect()
    }

    /// How many investigations the character has ever started.
    pub fn investigations_started(&self, character: CharacterId) -> usize {
        self.investigations
            .values()
            .filter(|inv| inv.character == character)
            .count()
    }

    /// The character's active investigation, if any.
    pub fn active_investigation(&self, character: CharacterId) -> Option<&Investigation> {
        self.investigations
            .values()
            .find(|inv| inv.character == character && inv.active && inv.ongoing)
    }

    /// Ongoing investigations whose target is `clue`.
    pub fn investigations_targeting(&self, clue: ClueId) -> Vec<InvestigationId> {
        self.investigations()
            .into_iter()
            .filter(|inv| inv.ongoing && inv.clue_target == Some(clue))
            .map(|inv| inv.id)
            .collect()
    }

    /// Record a helper on an investigation. Each character helps at most once per investigation.
    pub fn add_assistant(
        &mut self,
        investigation: InvestigationId,
        assistant: InvestigationAssistant,
    ) -> LoreResult<()> {
        if !self.characters.contains_key(&assistant.character) {
            return Err(LoreError::CharacterNotFound(assistant.character));
        }
        let inv = self.investigation_mut(investigation)?;
        if inv.assistant(assistant.character).is_some() {
            return Err(LoreError::DuplicateAssistant {
                investigation,
                character: assistant.character,
            });
        }
        inv.assistants.push(assistant);
        Ok(())
    }

    /// Investigations the character is currently helping with.
    pub fn helping(&self, character: CharacterId) -> Vec<InvestigationId> {
        self.investigations()
            .into_iter()
            .filter(|inv| {
                inv.ongoing
                    && inv
                        .assistant(character)
                        .is_some_and(|a| a.currently_helping)
            })
            .map(|inv| inv.id)
            .collect()
    }

    // -----------------------------------------------------------------------
    // Statistics
    // -----------------------------------------------------------------------

    /// Number of clues.
    pub fn clue_count(&self) -> usize {
        self.clues.len()
    }

    /// Number of revelations.
    pub fn revelation_count(&self) -> usize {
        self.revelations.len()
    }

    /// Number of characters.
    pub fn character_count(&self) -> usize {
        self.characters.len()
    }
}

/// Resolve a record by ID prefix first, then by exact case-insensitive name.
fn resolve<'a, Id: Copy + Eq>(
    needle: &str,
    records: impl Iterator<Item = (Id, &'a str)>,
    matches_prefix: impl Fn(&Id, &str) -> bool,
) -> LoreResult<Id> {
    let needle = needle.trim();
    let lower = needle.to_lowercase();
    let records: Vec<(Id, &str)> = records.collect();

    let by_name: Vec<Id> = records
        .iter()
        .filter(|(_, name)| name.to_lowercase() == lower)
        .map(|(id, _)| *id)
        .collect();
    if let [id] = by_name.as_slice() {
        return Ok(*id);
    }
    if by_name.len() > 1 {
        return Err(LoreError::Ambiguous(needle.to_string()));
    }

    let by_prefix: Vec<Id> = records
        .iter()
        .filter(|(id, _)| matches_prefix(id, needle))
        .map(|(id, _)| *id)
        .collect();
    match by_prefix.as_slice() {
        [id] => Ok(*id),
        [] => Err(LoreError::NoMatch(needle.to_string())),
        _ => Err(LoreError::Ambiguous(needle.to_string())),
    }
}
