use std::{fs, path::Path};

use anyhow::{bail, ensure, Context, Result};
use serde::Deserialize;
use snake_pilot_core::{Board, CellCoord, SnakeBody};
use snake_pilot_system_pathfinding::PathFinder;

/// Delimiter separating the column and row of a cell argument.
const COORD_DELIMITER: char = ',';
/// Delimiter separating the cells of a body argument.
const CELL_DELIMITER: char = ';';

/// Board snapshot handed to the pathfinder for a single query.
///
/// Scenario files are TOML documents with `width`, `height`, `goal` and a
/// head-first `body` array, each cell written as `{ column = .., row = .. }`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    /// Number of columns on the board.
    pub(crate) width: u32,
    /// Number of rows on the board.
    pub(crate) height: u32,
    /// Snake cells ordered from head to tail.
    pub(crate) body: Vec<CellCoord>,
    /// Cell the snake is steering toward.
    pub(crate) goal: CellCoord,
}

impl Scenario {
    /// Snapshot used when no scenario is supplied: a three-cell snake on a
    /// 20x15 board chasing an apple up and to the left.
    #[must_use]
    pub(crate) fn example() -> Self {
        Self {
            width: 20,
            height: 15,
            body: vec![
                CellCoord::new(10, 10),
                CellCoord::new(10, 11),
                CellCoord::new(10, 12),
            ],
            goal: CellCoord::new(5, 5),
        }
    }

    /// Reads and parses a scenario file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to load scenario file {}", path.display()))
    }

    /// Parses scenario TOML contents.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse scenario toml contents")
    }

    /// Validates the snapshot and prepares the pathfinder inputs.
    pub(crate) fn into_query(self) -> Result<Query> {
        let board = Board::new(self.width, self.height).context("invalid board dimensions")?;

        for cell in self.body.iter().chain(std::iter::once(&self.goal)) {
            ensure!(
                board.contains(*cell),
                "cell {cell} lies outside the {}x{} board",
                board.width(),
                board.height()
            );
        }

        let body = SnakeBody::new(self.body).context("invalid snake body")?;

        Ok(Query {
            finder: PathFinder::from_board(board),
            body,
            goal: self.goal,
        })
    }
}

/// Validated inputs for a single pathfinder query.
#[derive(Clone, Debug)]
pub(crate) struct Query {
    /// Planner configured for the scenario's board.
    pub(crate) finder: PathFinder,
    /// Snake body the search starts from.
    pub(crate) body: SnakeBody,
    /// Cell the snake is steering toward.
    pub(crate) goal: CellCoord,
}

/// Parses a cell written as `column,row`.
pub(crate) fn parse_cell(value: &str) -> Result<CellCoord> {
    let Some((column, row)) = value.trim().split_once(COORD_DELIMITER) else {
        bail!("cell '{value}' must be written as column{COORD_DELIMITER}row");
    };

    let column = column
        .trim()
        .parse::<u32>()
        .with_context(|| format!("could not parse column of cell '{value}'"))?;
    let row = row
        .trim()
        .parse::<u32>()
        .with_context(|| format!("could not parse row of cell '{value}'"))?;

    Ok(CellCoord::new(column, row))
}

/// Parses a head-first body written as `column,row;column,row;...`.
pub(crate) fn parse_body(value: &str) -> Result<Vec<CellCoord>> {
    value
        .split(CELL_DELIMITER)
        .filter(|segment| !segment.trim().is_empty())
        .map(parse_cell)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scenario_toml() {
        let scenario = Scenario::parse(
            r#"
                width = 20
                height = 15
                goal = { column = 5, row = 5 }
                body = [
                    { column = 10, row = 10 },
                    { column = 10, row = 11 },
                    { column = 10, row = 12 },
                ]
            "#,
        )
        .expect("scenario parses");

        assert_eq!(scenario, Scenario::example());
    }

    #[test]
    fn loads_bundled_scenario_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios/boxed_in.toml");
        let query = Scenario::load(&path)
            .expect("scenario loads")
            .into_query()
            .expect("scenario is valid");

        assert!(query.finder.find_path(&query.body, query.goal).is_none());
        assert_eq!(
            query.finder.get_next_move(&query.body, query.goal),
            snake_pilot_core::Direction::Right
        );
    }

    #[test]
    fn missing_scenario_file_reports_path() {
        let error = Scenario::load(Path::new("does/not/exist.toml")).expect_err("missing file");
        assert!(format!("{error:#}").contains("does/not/exist.toml"));
    }

    #[test]
    fn rejects_unknown_scenario_fields() {
        let error = Scenario::parse(
            r#"
                width = 3
                height = 3
                body = []
                goal = { column = 0, row = 0 }
                speed = 4
            "#,
        )
        .expect_err("unknown field rejected");
        assert!(format!("{error:#}").contains("speed"));
    }

    #[test]
    fn query_rejects_zero_width() {
        let scenario = Scenario {
            width: 0,
            ..Scenario::example()
        };
        let error = scenario.into_query().expect_err("zero width rejected");
        assert!(format!("{error:#}").contains("width must be positive"));
    }

    #[test]
    fn query_rejects_empty_body() {
        let scenario = Scenario {
            body: Vec::new(),
            ..Scenario::example()
        };
        let error = scenario.into_query().expect_err("empty body rejected");
        assert!(format!("{error:#}").contains("at least a head cell"));
    }

    #[test]
    fn query_rejects_out_of_bounds_cells() {
        let scenario = Scenario {
            goal: CellCoord::new(20, 0),
            ..Scenario::example()
        };
        let error = scenario.into_query().expect_err("goal outside board rejected");
        assert!(format!("{error:#}").contains("outside the 20x15 board"));
    }

    #[test]
    fn example_query_moves_toward_goal() {
        let query = Scenario::example().into_query().expect("example is valid");
        let direction = query.finder.get_next_move(&query.body, query.goal);
        let next = query.finder.board().step(query.body.head(), direction);
        let board = query.finder.board();

        assert_eq!(
            board.distance(next, query.goal) + 1,
            board.distance(query.body.head(), query.goal)
        );
    }

    #[test]
    fn parses_cells_and_bodies() {
        assert_eq!(parse_cell(" 4, 7 ").expect("cell parses"), CellCoord::new(4, 7));
        assert!(parse_cell("4").is_err());
        assert!(parse_cell("4,-1").is_err());

        assert_eq!(
            parse_body("1,1;1,2; 1,3;").expect("body parses"),
            vec![
                CellCoord::new(1, 1),
                CellCoord::new(1, 2),
                CellCoord::new(1, 3),
            ]
        );
        assert!(parse_body("").expect("empty body parses").is_empty());
    }
}
