//! The investigation desk: the lore store plus everything needed to act on it.
//!
//! A [`Desk`] owns the store, the server settings, the dice, the notifier,
//! and the per-character state that player commands build up (creation
//! forms and cached costs). Discovery, weekly outcomes, and the command
//! handlers are implemented on it in their own modules.

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;

use spur_core::{CharacterId, ClueId, GameSettings, InvestigationId, LoreStore, UNSET_ROLL};
use spur_mechanics::{DiceCheck, KeepHighestCheck, RollEngine, completion_value_for, difficulty};

use crate::cache::{CostCache, Costs};
use crate::config::DeskConfig;
use crate::error::DeskResult;
use crate::form::InvestigationForm;
use crate::hooks::UnlockHooks;
use crate::notify::{Inbox, Notifier};
use crate::target::find_target;

/// Runs investigations against a lore store.
pub struct Desk<N: Notifier = Inbox> {
    pub(crate) store: LoreStore,
    pub(crate) settings: GameSettings,
    pub(crate) config: DeskConfig,
    pub(crate) notifier: N,
    pub(crate) hooks: UnlockHooks,
    pub(crate) dice: Box<dyn DiceCheck>,
    pub(crate) forms: HashMap<CharacterId, InvestigationForm>,
    pub(crate) costs: CostCache,
    pub(crate) rng: StdRng,
    week: u32,
}

impl Desk<Inbox> {
    /// A desk that collects notifications in an [`Inbox`].
    pub fn new(store: LoreStore, settings: GameSettings, config: DeskConfig) -> Self {
        Self::with_notifier(store, settings, config, Inbox::new())
    }
}

impl<N: Notifier> Desk<N> {
    /// A desk that sends notifications through `notifier`.
    pub fn with_notifier(
        store: LoreStore,
        settings: GameSettings,
        config: DeskConfig,
        notifier: N,
    ) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            store,
            settings,
            config,
            notifier,
            hooks: UnlockHooks::new(),
            dice: Box::new(KeepHighestCheck),
            forms: HashMap::new(),
            costs: CostCache::new(),
            rng,
            week: 0,
        }
    }

    /// Replace the dice check.
    pub fn with_dice(mut self, dice: impl DiceCheck + 'static) -> Self {
        self.dice = Box::new(dice);
        self
    }

    /// Start counting from `week`.
    pub fn with_week(mut self, week: u32) -> Self {
        self.week = week;
        self
    }

    /// The lore store.
    pub fn store(&self) -> &LoreStore {
        &self.store
    }

    /// Mutable lore store.
    ///
    /// Cached costs are not refreshed automatically. Call
    /// [`Desk::invalidate_costs`] after editing a character sheet.
    pub fn store_mut(&mut self) -> &mut LoreStore {
        &mut self.store
    }

    /// Server settings.
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Mutable server settings.
    pub fn settings_mut(&mut self) -> &mut GameSettings {
        &mut self.settings
    }

    /// Desk configuration.
    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    /// The notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Mutable notifier.
    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Unlock handlers.
    pub fn hooks_mut(&mut self) -> &mut UnlockHooks {
        &mut self.hooks
    }

    /// Weeks processed so far.
    pub fn week(&self) -> u32 {
        self.week
    }

    pub(crate) fn advance_week(&mut self) {
        self.week = self.week.saturating_add(1);
    }

    /// A character's draft investigation, if they have one.
    pub fn form(&self, character: CharacterId) -> Option<&InvestigationForm> {
        self.forms.get(&character)
    }

    /// A character's investigation costs.
    pub fn costs(&mut self, character: CharacterId) -> DeskResult<Costs> {
        let sheet = self.store.character(character)?;
        Ok(self.costs.get(sheet))
    }

    /// Drop one character's cached costs, or everyone's with `None`.
    pub fn invalidate_costs(&mut self, character: Option<CharacterId>) {
        match character {
            Some(id) => self.costs.invalidate(id),
            None => self.costs.invalidate_all(),
        }
    }

    /// Give back the store, settings, and notifier.
    pub fn into_parts(self) -> (LoreStore, GameSettings, N) {
        (self.store, self.settings, self.notifier)
    }

    // -----------------------------------------------------------------------
    // Rolls and targets
    // -----------------------------------------------------------------------

    /// Roll an investigation for this week, replacing any stored roll.
    pub fn roll(
        &mut self,
        id: InvestigationId,
        modifier: i32,
        diff: Option<i32>,
    ) -> DeskResult<i32> {
        self.resolve_target(id)?;
        let engine = RollEngine::new(&self.settings, self.dice.as_ref());
        Ok(engine.roll(&mut self.store, id, modifier, diff, &mut self.rng)?)
    }

    /// This week's roll, rolling first if needed.
    ///
    /// A stored roll is discarded when the target had to be picked first,
    /// since it was made against the untargeted difficulty.
    pub fn get_roll(&mut self, id: InvestigationId) -> DeskResult<i32> {
        self.retarget(id)?;
        let engine = RollEngine::new(&self.settings, self.dice.as_ref());
        Ok(engine.get_roll(&mut self.store, id, &mut self.rng)?)
    }

    /// The investigation's current difficulty.
    pub fn difficulty(&mut self, id: InvestigationId) -> DeskResult<i32> {
        self.resolve_target(id)?;
        let inv = self.store.investigation(id)?;
        Ok(difficulty(&self.store, &self.settings, inv, &mut self.rng))
    }

    /// The investigation's target, picking one from its topic if it has none.
    ///
    /// A newly picked target also sets the completion value.
    pub fn targeted_clue(&mut self, id: InvestigationId) -> DeskResult<Option<ClueId>> {
        let inv = self.store.investigation(id)?;
        if let Some(target) = inv.clue_target
            && self.store.get_clue(target).is_some()
        {
            return Ok(Some(target));
        }
        let picked = find_target(&self.store, inv, &mut self.rng);
        self.set_target(id, picked)?;
        Ok(picked)
    }

    /// Automated investigations roll against their target's rating, so the
    /// target must exist before difficulty is read.
    fn resolve_target(&mut self, id: InvestigationId) -> DeskResult<Option<ClueId>> {
        let inv = self.store.investigation(id)?;
        if !inv.automate_result {
            return Ok(inv.clue_target);
        }
        self.targeted_clue(id)
    }

    /// Resolve the target, dropping a stored roll if the target moved.
    pub(crate) fn retarget(&mut self, id: InvestigationId) -> DeskResult<Option<ClueId>> {
        let before = self.store.investigation(id)?.clue_target;
        let target = self.resolve_target(id)?;
        if target != before {
            self.store.investigation_mut(id)?.roll = UNSET_ROLL;
        }
        Ok(target)
    }

    /// Point an investigation at `clue`, or clear its target.
    pub fn set_target(&mut self, id: InvestigationId, clue: Option<ClueId>) -> DeskResult<()> {
        let completion = match clue {
            Some(clue) => Some(completion_value_for(&self.store, clue)?),
            None => None,
        };
        let inv = self.store.investigation_mut(id)?;
        inv.clue_target = clue;
        if let Some(value) = completion {
            inv.completion_value = value;
        }
        Ok(())
    }

    /// Change a clue's rating and rescale every ongoing investigation after it.
    pub fn set_clue_rating(&mut self, clue: ClueId, rating: u32) -> DeskResult<()> {
        self.store
            .get_clue_mut(clue)
            .ok_or(spur_core::LoreError::ClueNotFound(clue))?
            .rating = rating;
        let value = completion_value_for(&self.store, clue)?;
        for id in self.store.investigations_targeting(clue) {
            self.store.investigation_mut(id)?.completion_value = value;
        }
        tracing::debug!(%clue, rating, completion = value, "clue rating changed");
        Ok(())
    }
}

impl<N: Notifier> std::fmt::Debug for Desk<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Desk")
            .field("week", &self.week)
            .field("clues", &self.store.clue_count())
            .field("characters", &self.store.character_count())
            .field("forms", &self.forms.len())
            .finish()
    }
}
