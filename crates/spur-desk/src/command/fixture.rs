//! A small table of players shared by the command tests.

use spur_core::{
    Character, CharacterId, Clue, ClueId, GameSettings, LoreStore, SearchTag, SearchTagId,
};
use spur_mechanics::FixedCheck;

use crate::config::DeskConfig;
use crate::desk::Desk;

pub(crate) struct Table {
    pub desk: Desk,
    pub mira: CharacterId,
    pub tobin: CharacterId,
    /// Mira's retainer, able to assist.
    pub pip: CharacterId,
    pub rats: SearchTagId,
    pub sewers: SearchTagId,
    /// Tagged rats and sewers.
    pub nest: ClueId,
    /// Tagged sewers only.
    pub well: ClueId,
}

/// Mira and Tobin (investigation 2, AP 100, social 50) with two clues to find.
pub(crate) fn table() -> Table {
    let mut store = LoreStore::new();
    let player = |name: &str| {
        Character::new(name)
            .with_skill("investigation", 2)
            .with_resources(100_000, 50, 50, 50)
    };
    let mira = store.add_character(player("Mira")).unwrap();
    let tobin = store.add_character(player("Tobin")).unwrap();
    let pip = store
        .add_character(Character::retainer("Pip", mira, 2))
        .unwrap();
    let rats = store.add_tag(SearchTag::new("rats")).unwrap();
    let sewers = store.add_tag(SearchTag::new("sewers")).unwrap();
    let nest = store
        .add_clue(
            Clue::new("Rat Nest", 20)
                .with_desc("Hundreds of them, under the old mill.")
                .investigable(true)
                .shareable(true)
                .with_tag(rats)
                .with_tag(sewers),
        )
        .unwrap();
    let well = store
        .add_clue(
            Clue::new("Old Well", 20)
                .with_desc("Something moves below.")
                .investigable(true)
                .shareable(true)
                .with_tag(sewers),
        )
        .unwrap();
    let desk = Desk::new(store, GameSettings::new(), DeskConfig::default())
        .with_dice(FixedCheck::new(50));
    Table {
        desk,
        mira,
        tobin,
        pip,
        rats,
        sewers,
        nest,
        well,
    }
}
