use serde::{Deserialize, Serialize};

use crate::arena::types::{Coord, Direction};

#[derive(Serialize, Debug)]
pub struct Status {
    pub name:    String,
    pub author:  String,
    pub version: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SnakeInfo {
    pub id:        String,
    pub name:      String,
    #[serde(default)]
    pub points:    i64,
    /// Flat board indices, head first.
    pub positions: Vec<i64>,
}

impl SnakeInfo {
    /// Dead snakes are reported with no positions.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.positions.is_empty()
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Map {
    pub width:              i64,
    pub height:             i64,
    pub snake_infos:        Vec<SnakeInfo>,
    #[serde(default)]
    pub food_positions:     Vec<i64>,
    #[serde(default)]
    pub obstacle_positions: Vec<i64>,
}

impl Map {
    #[must_use]
    pub const fn coord_of(&self, position: i64) -> Coord {
        Coord {
            x: position % self.width,
            y: position / self.width,
        }
    }

    #[must_use]
    pub fn coords_of(&self, positions: &[i64]) -> Vec<Coord> {
        positions.iter().map(|p| self.coord_of(*p)).collect()
    }

    #[must_use]
    pub fn food(&self) -> Vec<Coord> {
        self.coords_of(&self.food_positions)
    }

    #[must_use]
    pub fn obstacles(&self) -> Vec<Coord> {
        self.coords_of(&self.obstacle_positions)
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MapUpdate {
    pub game_tick:           u64,
    pub game_id:             String,
    pub receiving_player_id: String,
    pub map:                 Map,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub direction: Direction,
    pub game_tick: u64,
    pub will_eat:  bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_update_and_decodes_positions() {
        let json = r#"{
            "gameTick": 4,
            "gameId": "g",
            "receivingPlayerId": "me",
            "map": {
                "width": 10,
                "height": 5,
                "snakeInfos": [
                    {"id": "me", "name": "a", "positions": [23, 13]},
                    {"id": "dead", "name": "b", "positions": []}
                ],
                "foodPositions": [49],
                "obstaclePositions": [0]
            }
        }"#;

        let update: MapUpdate =
            serde_json::from_str(json).expect("update should parse");
        let map = &update.map;

        assert_eq!(update.game_tick, 4);
        assert_eq!(
            map.coords_of(&map.snake_infos[0].positions),
            vec![Coord::new(3, 2), Coord::new(3, 1)]
        );
        assert!(!map.snake_infos[1].is_alive());
        assert_eq!(map.food(), vec![Coord::new(9, 4)]);
        assert_eq!(map.obstacles(), vec![Coord::new(0, 0)]);
    }

    #[test]
    fn movement_serialises_uppercase() {
        let json = serde_json::to_string(&Movement {
            direction: Direction::Left,
            game_tick: 2,
            will_eat:  true,
        })
        .expect("movement should serialise");
        assert_eq!(json, r#"{"direction":"LEFT","gameTick":2,"willEat":true}"#);
    }
}
