//! Read-only team dataset used to configure fixtures.

use indexmap::IndexMap;

use crate::state::match_state::{AnimationType, GoalAnimationType, Player, Team};

/// Ordered lookup of every team the controller can field.
#[derive(Debug, Clone)]
pub struct TeamCatalog {
    teams: IndexMap<String, Team>,
}

impl TeamCatalog {
    /// Build a catalog from teams, keyed by their id. Later duplicates replace earlier ones.
    pub fn new(teams: impl IntoIterator<Item = Team>) -> Self {
        let teams = teams
            .into_iter()
            .map(|team| (team.id.clone(), team))
            .collect();
        Self { teams }
    }

    /// Look a team up by id.
    pub fn get(&self, id: &str) -> Option<&Team> {
        self.teams.get(id)
    }

    /// Iterate teams in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    /// Number of teams in the catalog.
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    /// Whether the catalog holds no team.
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

impl Default for TeamCatalog {
    fn default() -> Self {
        Self::new(default_teams())
    }
}

struct TeamSeed {
    id: &'static str,
    name: &'static str,
    short_name: &'static str,
    primary: &'static str,
    secondary: &'static str,
    coach: &'static str,
    animation: AnimationType,
    goal_animation: GoalAnimationType,
}

impl TeamSeed {
    fn build(self, players: Vec<Player>) -> Team {
        Team {
            id: self.id.into(),
            name: self.name.into(),
            short_name: self.short_name.into(),
            color_primary: self.primary.into(),
            color_secondary: self.secondary.into(),
            logo: placeholder_logo(self.short_name, self.primary),
            players,
            coach: self.coach.into(),
            animation_type: self.animation,
            goal_animation_type: self.goal_animation,
        }
    }

    fn with_generic_roster(self) -> Team {
        let players = generic_roster(self.short_name);
        self.build(players)
    }
}

fn placeholder_logo(short_name: &str, color: &str) -> String {
    format!(
        "https://placehold.co/400x400/{}/ffffff/png?text={short_name}",
        color.trim_start_matches('#')
    )
}

/// Eleven numbered players with a goalkeeper first.
fn generic_roster(prefix: &str) -> Vec<Player> {
    (0..11u32)
        .map(|i| Player {
            id: format!("{prefix}-{i}"),
            number: i + 1,
            name: if i == 0 {
                "Goalkeeper".into()
            } else {
                format!("Player {}", i + 1)
            },
            position: if i == 0 { "GK" } else { "P" }.into(),
            image: Some(format!(
                "https://placehold.co/200x200/222/fff?text={prefix}+{}",
                i + 1
            )),
            is_captain: None,
        })
        .collect()
}

fn named_roster(prefix: &str, entries: &[(u32, &str, &str)]) -> Vec<Player> {
    entries
        .iter()
        .enumerate()
        .map(|(index, (number, name, position))| Player {
            id: format!("{prefix}-{}", index + 1),
            number: *number,
            name: (*name).into(),
            position: (*position).into(),
            image: None,
            is_captain: None,
        })
        .collect()
}

fn default_teams() -> Vec<Team> {
    vec![
        TeamSeed {
            id: "rma",
            name: "Real Madrid",
            short_name: "RMA",
            primary: "#FEBE10",
            secondary: "#001c55",
            coach: "Carlo Ancelotti",
            animation: AnimationType::RoyalSlide,
            goal_animation: GoalAnimationType::HugeSlide,
        }
        .build(named_roster(
            "rma",
            &[
                (1, "Courtois", "GK"),
                (2, "Carvajal", "DEF"),
                (3, "Militão", "DEF"),
                (22, "Rüdiger", "DEF"),
                (23, "Mendy", "DEF"),
                (8, "Valverde", "MID"),
                (14, "Tchouaméni", "MID"),
                (5, "Bellingham", "MID"),
                (11, "Rodrygo", "FWD"),
                (7, "Vinícius Jr.", "FWD"),
                (9, "Mbappé", "FWD"),
            ],
        )),
        TeamSeed {
            id: "bar",
            name: "FC Barcelona",
            short_name: "BAR",
            primary: "#A50044",
            secondary: "#004D98",
            coach: "Hansi Flick",
            animation: AnimationType::BlaugranaBounce,
            goal_animation: GoalAnimationType::CenterBurst,
        }
        .build(named_roster(
            "bar",
            &[
                (1, "Ter Stegen", "GK"),
                (23, "Koundé", "DEF"),
                (2, "Cubarsí", "DEF"),
                (4, "Araújo", "DEF"),
                (3, "Balde", "DEF"),
                (8, "Pedri", "MID"),
                (6, "Gavi", "MID"),
                (21, "De Jong", "MID"),
                (19, "Lamine Yamal", "FWD"),
                (11, "Raphinha", "FWD"),
                (9, "Lewandowski", "FWD"),
            ],
        )),
        TeamSeed {
            id: "mci",
            name: "Manchester City",
            short_name: "MCI",
            primary: "#6CABDD",
            secondary: "#1C2C5B",
            coach: "Pep Guardiola",
            animation: AnimationType::CyberFlash,
            goal_animation: GoalAnimationType::CenterBurst,
        }
        .with_generic_roster(),
        TeamSeed {
            id: "psg",
            name: "Paris Saint-Germain",
            short_name: "PSG",
            primary: "#004171",
            secondary: "#DA291C",
            coach: "Luis Enrique",
            animation: AnimationType::CyberFlash,
            goal_animation: GoalAnimationType::HugeSlide,
        }
        .with_generic_roster(),
        TeamSeed {
            id: "bay",
            name: "Bayern Munich",
            short_name: "BAY",
            primary: "#DC052D",
            secondary: "#0066B2",
            coach: "Vincent Kompany",
            animation: AnimationType::Standard,
            goal_animation: GoalAnimationType::HugeSlide,
        }
        .with_generic_roster(),
        TeamSeed {
            id: "bra",
            name: "Brazil",
            short_name: "BRA",
            primary: "#FFDF00",
            secondary: "#009C3B",
            coach: "Dorival Júnior",
            animation: AnimationType::SambaPulse,
            goal_animation: GoalAnimationType::CenterBurst,
        }
        .with_generic_roster(),
        TeamSeed {
            id: "arg",
            name: "Argentina",
            short_name: "ARG",
            primary: "#74ACDF",
            secondary: "#FFFFFF",
            coach: "Lionel Scaloni",
            animation: AnimationType::AlbicelesteSpin,
            goal_animation: GoalAnimationType::HugeSlide,
        }
        .with_generic_roster(),
        TeamSeed {
            id: "fra",
            name: "France",
            short_name: "FRA",
            primary: "#002395",
            secondary: "#ED2939",
            coach: "Didier Deschamps",
            animation: AnimationType::Standard,
            goal_animation: GoalAnimationType::HugeSlide,
        }
        .with_generic_roster(),
        TeamSeed {
            id: "eng",
            name: "England",
            short_name: "ENG",
            primary: "#FFFFFF",
            secondary: "#CE1124",
            coach: "Gareth Southgate",
            animation: AnimationType::RoyalSlide,
            goal_animation: GoalAnimationType::HugeSlide,
        }
        .with_generic_roster(),
        TeamSeed {
            id: "ita",
            name: "Italy",
            short_name: "ITA",
            primary: "#0064AA",
            secondary: "#FFFFFF",
            coach: "Luciano Spalletti",
            animation: AnimationType::Standard,
            goal_animation: GoalAnimationType::HugeSlide,
        }
        .with_generic_roster(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_preserves_order_and_rosters() {
        let catalog = TeamCatalog::default();
        let ids: Vec<_> = catalog.iter().map(|team| team.id.as_str()).collect();
        assert_eq!(&ids[..2], &["rma", "bar"]);
        assert_eq!(catalog.len(), 10);
        assert!(catalog.iter().all(|team| team.players.len() == 11));
    }

    #[test]
    fn generated_rosters_start_with_a_goalkeeper() {
        let catalog = TeamCatalog::default();
        let city = catalog.get("mci").unwrap();
        assert_eq!(city.players[0].position, "GK");
        assert_eq!(city.players[0].id, "MCI-0");
        assert_eq!(city.players[10].number, 11);
        assert!(city.logo.contains("6CABDD"));
    }

    #[test]
    fn unknown_ids_are_absent() {
        assert!(TeamCatalog::default().get("xyz").is_none());
    }
}
