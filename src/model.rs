use std::fmt::Write;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Schedule {
    pub dates: Vec<ScheduleDate>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleDate {
    pub date: String,
    pub games: Vec<Game>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Game {
    pub game_pk: u64,
    pub game_date: Option<String>,
    pub status: GameStatus,
    pub teams: GameTeams,
    pub venue: Venue,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameStatus {
    pub abstract_game_state: String, // "Preview", "Live", "Final"
    pub detailed_state: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameTeams {
    pub home: TeamSide,
    pub away: TeamSide,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamSide {
    pub team: TeamRef,
    pub score: u32,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamRef {
    pub id: Option<u64>,
    pub name: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Venue {
    pub name: String,
}

impl Schedule {
    /// All games across every date, in the order the API listed them.
    pub fn games(&self) -> impl Iterator<Item = &Game> {
        self.dates.iter().flat_map(|d| d.games.iter())
    }

    pub fn game_count(&self) -> usize {
        self.dates.iter().map(|d| d.games.len()).sum()
    }

    /// Renders one text block per game. Numbering runs across dates and is
    /// not reset when a new date starts.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (idx, game) in self.games().enumerate() {
            // Writing into a String cannot fail.
            let _ = write_game_block(&mut out, idx + 1, game);
        }
        out
    }
}

fn write_game_block(out: &mut String, n: usize, game: &Game) -> std::fmt::Result {
    let home = &game.teams.home;
    let away = &game.teams.away;
    writeln!(out, "Game {}: {}", n, game.venue.name)?;
    writeln!(out, "Home: {} -- {}", home.team.name, home.score)?;
    writeln!(out, "Away: {} -- {}", away.team.name, away.score)?;
    writeln!(out)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE_SCHEDULE: &str = r#"{
      "copyright": "NHL and the NHL Shield are registered trademarks of the National Hockey League.",
      "totalItems": 3,
      "totalEvents": 0,
      "totalGames": 3,
      "dates": [
        {
          "date": "2019-10-02",
          "totalItems": 2,
          "games": [
            {
              "gamePk": 2019020001,
              "link": "/api/v1/game/2019020001/feed/live",
              "gameType": "R",
              "season": "20192020",
              "gameDate": "2019-10-02T23:00:00Z",
              "status": {
                "abstractGameState": "Final",
                "codedGameState": "7",
                "detailedState": "Final",
                "statusCode": "7",
                "startTimeTBD": false
              },
              "teams": {
                "away": {
                  "leagueRecord": { "wins": 0, "losses": 1, "type": "league" },
                  "score": 3,
                  "team": { "id": 9, "name": "Ottawa Senators", "link": "/api/v1/teams/9" }
                },
                "home": {
                  "leagueRecord": { "wins": 1, "losses": 0, "type": "league" },
                  "score": 5,
                  "team": { "id": 10, "name": "Toronto Maple Leafs", "link": "/api/v1/teams/10" }
                }
              },
              "venue": { "id": 5015, "name": "Scotiabank Arena", "link": "/api/v1/venues/5015" }
            },
            {
              "gamePk": 2019020002,
              "gameDate": "2019-10-03T02:00:00Z",
              "status": { "abstractGameState": "Live", "detailedState": "In Progress" },
              "teams": {
                "away": { "score": 2, "team": { "id": 15, "name": "Washington Capitals" } },
                "home": { "score": 2, "team": { "id": 19, "name": "St. Louis Blues" } }
              },
              "venue": { "name": "Enterprise Center" }
            }
          ],
          "events": [],
          "matches": []
        },
        {
          "date": "2019-10-03",
          "games": [
            {
              "gamePk": 2019020003,
              "gameDate": "2019-10-03T23:00:00Z",
              "status": { "abstractGameState": "Preview", "detailedState": "Scheduled" },
              "teams": {
                "away": { "score": 0, "team": { "id": 8, "name": "Montréal Canadiens" } },
                "home": { "score": 0, "team": { "id": 7, "name": "Buffalo Sabres" } }
              },
              "venue": { "name": "KeyBank Center" }
            }
          ]
        }
      ]
    }"#;

    fn single_game(venue: &str, home: (&str, u32), away: (&str, u32)) -> Game {
        Game {
            teams: GameTeams {
                home: TeamSide {
                    team: TeamRef { id: None, name: home.0.to_string() },
                    score: home.1,
                },
                away: TeamSide {
                    team: TeamRef { id: None, name: away.0.to_string() },
                    score: away.1,
                },
            },
            venue: Venue { name: venue.to_string() },
            ..Default::default()
        }
    }

    #[test]
    fn test_deserialize_sample() {
        let schedule: Schedule = serde_json::from_str(SAMPLE_SCHEDULE).expect("Failed to deserialize");
        assert_eq!(schedule.dates.len(), 2);
        assert_eq!(schedule.game_count(), 3);

        let first = &schedule.dates[0].games[0];
        assert_eq!(first.game_pk, 2019020001);
        assert_eq!(first.venue.name, "Scotiabank Arena");
        assert_eq!(first.teams.home.team.name, "Toronto Maple Leafs");
        assert_eq!(first.teams.home.team.id, Some(10));
        assert_eq!(first.teams.home.score, 5);
        assert_eq!(first.teams.away.score, 3);
        assert_eq!(first.status.abstract_game_state, "Final");
    }

    #[test]
    fn test_missing_fields_default() {
        let schedule: Schedule =
            serde_json::from_str(r#"{"dates":[{"games":[{"venue":{}}]}]}"#).unwrap();
        let game = schedule.games().next().unwrap();
        assert_eq!(game.teams.home.score, 0);
        assert!(game.teams.away.team.name.is_empty());
        assert!(game.game_date.is_none());
    }

    #[test]
    fn test_wrong_type_is_error() {
        let res = serde_json::from_str::<Schedule>(r#"{"dates":"tomorrow"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_render_single_game() {
        let schedule = Schedule {
            dates: vec![ScheduleDate {
                date: "2020-01-01".into(),
                games: vec![single_game("Rink A", ("Team X", 3), ("Team Y", 2))],
            }],
        };
        assert_eq!(
            schedule.render(),
            "Game 1: Rink A\nHome: Team X -- 3\nAway: Team Y -- 2\n\n"
        );
    }

    #[test]
    fn test_render_numbers_across_dates() {
        let schedule: Schedule = serde_json::from_str(SAMPLE_SCHEDULE).unwrap();
        let text = schedule.render();

        assert_eq!(text.matches("Game ").count(), 3);
        assert!(text.contains("Game 1: Scotiabank Arena\n"));
        assert!(text.contains("Game 2: Enterprise Center\n"));
        // Second date continues the count.
        assert!(text.contains("Game 3: KeyBank Center\nHome: Buffalo Sabres -- 0\nAway: Montréal Canadiens -- 0\n\n"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_render_empty() {
        let schedule: Schedule = serde_json::from_str(r#"{"dates":[]}"#).unwrap();
        assert_eq!(schedule.render(), "");

        let schedule = Schedule {
            dates: vec![ScheduleDate::default(), ScheduleDate::default()],
        };
        assert_eq!(schedule.game_count(), 0);
        assert_eq!(schedule.render(), "");
    }
}
