use serde::{Deserialize, Serialize};

/// Roster token for a reaction that fires but leaves the battlefield unchanged
pub const NO_CHANGE_LABEL: &str = "상태변환없음";
/// Roster token for a reaction that ends the chain
pub const END_LABEL: &str = "終了";

/// Roster category marking an elite character
const COMMANDER_LABEL: &str = "名将";

/// Faction a character belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Faction {
    Shu,
    Wei,
    Wu,
    Qun,
    Ye,
}

impl Faction {
    /// All factions in display order
    pub fn all() -> &'static [Faction] {
        &[
            Faction::Shu,
            Faction::Wei,
            Faction::Wu,
            Faction::Qun,
            Faction::Ye,
        ]
    }

    /// Parse either the native roster token or the romanized name
    pub fn parse(s: &str) -> Option<Faction> {
        match s.trim() {
            "蜀" => return Some(Faction::Shu),
            "魏" => return Some(Faction::Wei),
            "呉" | "吳" => return Some(Faction::Wu),
            "群" => return Some(Faction::Qun),
            "野" => return Some(Faction::Ye),
            _ => {}
        }
        match s.trim().to_lowercase().as_str() {
            "shu" => Some(Faction::Shu),
            "wei" => Some(Faction::Wei),
            "wu" => Some(Faction::Wu),
            "qun" => Some(Faction::Qun),
            "ye" => Some(Faction::Ye),
            _ => None,
        }
    }

    /// Native single-character token
    pub fn symbol(&self) -> &'static str {
        match self {
            Faction::Shu => "蜀",
            Faction::Wei => "魏",
            Faction::Wu => "呉",
            Faction::Qun => "群",
            Faction::Ye => "野",
        }
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Faction::Shu => write!(f, "Shu"),
            Faction::Wei => write!(f, "Wei"),
            Faction::Wu => write!(f, "Wu"),
            Faction::Qun => write!(f, "Qun"),
            Faction::Ye => write!(f, "Ye"),
        }
    }
}

/// Ordinary character or elite commander
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[default]
    Ordinary,
    Commander,
}

impl Tier {
    pub fn parse(s: &str) -> Tier {
        let s = s.trim();
        if s == COMMANDER_LABEL || s.eq_ignore_ascii_case("commander") {
            Tier::Commander
        } else {
            Tier::Ordinary
        }
    }
}

/// Which of a character's two abilities starts a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilitySlot {
    Primary,
    Secondary,
}

impl AbilitySlot {
    pub fn both() -> [AbilitySlot; 2] {
        [AbilitySlot::Primary, AbilitySlot::Secondary]
    }
}

impl std::fmt::Display for AbilitySlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbilitySlot::Primary => write!(f, "primary"),
            AbilitySlot::Secondary => write!(f, "secondary"),
        }
    }
}

/// What a reaction rule leaves behind when it fires
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum ReactionOutput {
    /// No reaction rule at all
    #[default]
    None,
    /// Produces a new state that can be chained from
    Active(String),
    /// Rule exists but never changes the state
    Blocked,
    /// Rule exists but ends the chain
    Terminal,
}

impl ReactionOutput {
    /// Map a raw roster label onto the tagged form
    pub fn parse(label: &str) -> ReactionOutput {
        let label = label.trim();
        if label.is_empty() {
            ReactionOutput::None
        } else if label == NO_CHANGE_LABEL {
            ReactionOutput::Blocked
        } else if label == END_LABEL {
            ReactionOutput::Terminal
        } else {
            ReactionOutput::Active(label.to_string())
        }
    }

    /// Label that a chain continues from, if any
    pub fn chainable(&self) -> Option<&str> {
        match self {
            ReactionOutput::Active(label) => Some(label),
            _ => None,
        }
    }
}

/// A character's single (trigger, output) reaction rule
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Reaction {
    pub trigger: String,
    pub output: ReactionOutput,
}

impl Reaction {
    pub fn new(trigger: &str, output: &str) -> Self {
        Self {
            trigger: trigger.trim().to_string(),
            output: ReactionOutput::parse(output),
        }
    }

    /// The state this rule produces when `state` is active, or `None` if the
    /// rule does not join a chain from there.
    pub fn chains_from(&self, state: &str) -> Option<&str> {
        if self.trigger == state {
            self.output.chainable()
        } else {
            None
        }
    }
}

/// A playable character as read from the roster
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub faction: Faction,
    pub tier: Tier,
    /// Effect label of the primary ability (empty when the slot is unusable)
    pub primary: String,
    /// Effect label of the secondary ability (empty when the slot is unusable)
    pub secondary: String,
    pub reaction: Reaction,
}

impl Character {
    pub fn new(name: &str, faction: Faction) -> Self {
        Self {
            name: name.trim().to_string(),
            faction,
            tier: Tier::Ordinary,
            primary: String::new(),
            secondary: String::new(),
            reaction: Reaction::default(),
        }
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_primary(mut self, effect: &str) -> Self {
        self.primary = effect.trim().to_string();
        self
    }

    pub fn with_secondary(mut self, effect: &str) -> Self {
        self.secondary = effect.trim().to_string();
        self
    }

    pub fn with_reaction(mut self, trigger: &str, output: &str) -> Self {
        self.reaction = Reaction::new(trigger, output);
        self
    }

    /// Effect label of an ability slot, `None` if the slot is blank
    pub fn ability(&self, slot: AbilitySlot) -> Option<&str> {
        let label = match slot {
            AbilitySlot::Primary => &self.primary,
            AbilitySlot::Secondary => &self.secondary,
        };
        let label = label.trim();
        (!label.is_empty()).then_some(label)
    }

    pub fn is_commander(&self) -> bool {
        self.tier == Tier::Commander
    }

    /// Name with the commander badge prepended
    pub fn display_label(&self) -> String {
        if self.is_commander() {
            format!("{} {}", COMMANDER_LABEL, self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Order characters for a selection list: faction, commanders first, then name.
pub fn sort_for_display(characters: &mut [Character]) {
    characters.sort_by(|a, b| {
        a.faction
            .cmp(&b.faction)
            .then_with(|| b.is_commander().cmp(&a.is_commander()))
            .then_with(|| a.name.cmp(&b.name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaction_output_sentinels() {
        assert_eq!(ReactionOutput::parse(""), ReactionOutput::None);
        assert_eq!(ReactionOutput::parse("  "), ReactionOutput::None);
        assert_eq!(ReactionOutput::parse(NO_CHANGE_LABEL), ReactionOutput::Blocked);
        assert_eq!(ReactionOutput::parse(END_LABEL), ReactionOutput::Terminal);
        // Only the roster tokens are sentinels; English words are ordinary states
        assert_eq!(
            ReactionOutput::parse("End"),
            ReactionOutput::Active("End".to_string())
        );
        assert_eq!(
            ReactionOutput::parse("no-change"),
            ReactionOutput::Active("no-change".to_string())
        );
        assert_eq!(
            ReactionOutput::parse("Guard"),
            ReactionOutput::Active("Guard".to_string())
        );
    }

    #[test]
    fn test_chains_from_requires_trigger_and_active_output() {
        let active = Reaction::new("Stun", "Guard");
        assert_eq!(active.chains_from("Stun"), Some("Guard"));
        assert_eq!(active.chains_from("Burn"), None);

        let terminal = Reaction::new("Stun", END_LABEL);
        assert_eq!(terminal.chains_from("Stun"), None);

        let blocked = Reaction::new("Stun", NO_CHANGE_LABEL);
        assert_eq!(blocked.chains_from("Stun"), None);

        // Empty trigger never matches a real state
        let missing = Reaction::new("", "");
        assert_eq!(missing.chains_from("Stun"), None);
    }

    #[test]
    fn test_blank_ability_slot() {
        let c = Character::new("Guan Yu", Faction::Shu)
            .with_primary("Stun")
            .with_secondary("   ");
        assert_eq!(c.ability(AbilitySlot::Primary), Some("Stun"));
        assert_eq!(c.ability(AbilitySlot::Secondary), None);
    }

    #[test]
    fn test_faction_parse() {
        assert_eq!(Faction::parse("蜀"), Some(Faction::Shu));
        assert_eq!(Faction::parse(" wei "), Some(Faction::Wei));
        assert_eq!(Faction::parse("QUN"), Some(Faction::Qun));
        assert_eq!(Faction::parse("Han"), None);
    }

    #[test]
    fn test_tier_and_label() {
        let c = Character::new("Zhuge Liang", Faction::Shu).with_tier(Tier::parse("名将"));
        assert!(c.is_commander());
        assert_eq!(c.display_label(), "名将 Zhuge Liang");
        assert_eq!(Tier::parse(""), Tier::Ordinary);
    }

    #[test]
    fn test_sort_for_display() {
        let mut roster = vec![
            Character::new("Cao Ren", Faction::Wei),
            Character::new("Zhang Fei", Faction::Shu),
            Character::new("Cao Cao", Faction::Wei).with_tier(Tier::Commander),
            Character::new("Guan Yu", Faction::Shu),
        ];
        sort_for_display(&mut roster);
        let names: Vec<&str> = roster.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Guan Yu", "Zhang Fei", "Cao Cao", "Cao Ren"]);
    }
}
