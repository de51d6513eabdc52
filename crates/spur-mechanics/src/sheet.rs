//! Stat and skill names that investigations accept.

/// Physical stats.
pub const PHYSICAL_STATS: [&str; 3] = ["strength", "dexterity", "stamina"];
/// Social stats.
pub const SOCIAL_STATS: [&str; 3] = ["charm", "command", "composure"];
/// Mental stats.
pub const MENTAL_STATS: [&str; 3] = ["intellect", "perception", "wits"];
/// Magic stats.
pub const MAGIC_STATS: [&str; 3] = ["mana", "luck", "willpower"];

/// Combat skills.
pub const COMBAT_SKILLS: [&str; 9] = [
    "athletics",
    "brawl",
    "dodge",
    "archery",
    "small wpn",
    "medium wpn",
    "huge wpn",
    "stealth",
    "survival",
];
/// Social skills.
pub const SOCIAL_SKILLS: [&str; 11] = [
    "intimidation",
    "leadership",
    "manipulation",
    "seduction",
    "diplomacy",
    "propaganda",
    "empathy",
    "etiquette",
    "performance",
    "haggling",
    "streetwise",
];
/// General skills.
pub const GENERAL_SKILLS: [&str; 17] = [
    "riddles",
    "legerdemain",
    "ride",
    "investigation",
    "law",
    "linguistics",
    "medicine",
    "occult",
    "stewardship",
    "theology",
    "agriculture",
    "economics",
    "teaching",
    "war",
    "animal ken",
    "artwork",
    "sailing",
];
/// Crafting skills.
pub const CRAFTING_SKILLS: [&str; 5] = ["sewing", "smithing", "tanning", "alchemy", "woodworking"];

/// Whether `name` is a stat, ignoring case.
pub fn is_valid_stat(name: &str) -> bool {
    let name = name.trim().to_lowercase();
    PHYSICAL_STATS
        .iter()
        .chain(&SOCIAL_STATS)
        .chain(&MENTAL_STATS)
        .chain(&MAGIC_STATS)
        .any(|s| *s == name)
}

/// Whether `name` is a skill, ignoring case.
pub fn is_valid_skill(name: &str) -> bool {
    let name = name.trim().to_lowercase();
    COMBAT_SKILLS
        .iter()
        .chain(&SOCIAL_SKILLS)
        .chain(&GENERAL_SKILLS)
        .chain(&CRAFTING_SKILLS)
        .any(|s| *s == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_validate_case_insensitively() {
        assert!(is_valid_stat("Wits"));
        assert!(is_valid_stat(" perception "));
        assert!(!is_valid_stat("investigation"));
        assert!(!is_valid_stat(""));
    }

    #[test]
    fn skills_include_multiword_names() {
        assert!(is_valid_skill("investigation"));
        assert!(is_valid_skill("Animal Ken"));
        assert!(!is_valid_skill("wits"));
    }
}
