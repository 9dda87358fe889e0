use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::PortraitError;

/// A single character cell of the portrait.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(rename = "char")]
    pub ch: char,
    /// Perceived brightness of the source pixel, 0 (dark) to 255 (light).
    pub brightness: u8,
    #[serde(rename = "isBackground")]
    pub is_background: bool,
}

impl Cell {
    pub fn new(ch: char, brightness: u8) -> Self {
        Self { ch, brightness, is_background: false }
    }

    pub fn background() -> Self {
        Self { ch: ' ', brightness: 255, is_background: true }
    }
}

/// Immutable rectangular grid of cells, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharGrid {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl CharGrid {
    /// Builds a grid from rows, rejecting empty and ragged input.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, PortraitError> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(PortraitError::EmptyGrid);
        }

        let height = u16::try_from(rows.len()).map_err(|_| PortraitError::InvalidLayout)?;
        let width = u16::try_from(width).map_err(|_| PortraitError::InvalidLayout)?;

        let mut cells = Vec::with_capacity(usize::from(width) * usize::from(height));
        for (row, line) in rows.into_iter().enumerate() {
            if line.len() != usize::from(width) {
                return Err(PortraitError::RaggedRow {
                    row,
                    expected: usize::from(width),
                    found: line.len(),
                });
            }
            cells.extend(line);
        }

        Ok(Self { width, height, cells })
    }

    pub fn from_json_str(json: &str) -> Result<Self, PortraitError> {
        let rows: Vec<Vec<Cell>> = serde_json::from_str(json)?;
        Self::from_rows(rows)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PortraitError> {
        let rows: Vec<Vec<Cell>> = serde_json::from_reader(reader)?;
        Self::from_rows(rows)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PortraitError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let grid = Self::from_reader(BufReader::new(file))?;
        debug!("loaded {}x{} character grid from {}", grid.width, grid.height, path.display());
        Ok(grid)
    }

    /// Serializes the grid as a pretty-printed array of rows.
    pub fn to_json_pretty(&self) -> Result<String, PortraitError> {
        let rows: Vec<&[Cell]> = self.cells.chunks(usize::from(self.width)).collect();
        Ok(serde_json::to_string_pretty(&rows)?)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// Iterates every cell together with its `(x, y)` position.
    pub fn cells(&self) -> impl Iterator<Item = (u16, u16, &Cell)> + '_ {
        let width = usize::from(self.width);
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| ((idx % width) as u16, (idx / width) as u16, cell))
    }

    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        let width = usize::from(self.width);
        self.cells.chunks(width).map(|row| row.iter().map(|cell| cell.ch).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_records() {
        let json = r#"[
            [{"char": " ", "brightness": 255, "isBackground": true},
             {"char": "@", "brightness": 12, "isBackground": false}]
        ]"#;
        let grid = CharGrid::from_json_str(json).unwrap();
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.height(), 1);
        assert_eq!(grid.get(1, 0), Some(&Cell::new('@', 12)));
        assert!(grid.get(0, 0).unwrap().is_background);
        assert_eq!(grid.get(2, 0), None);
    }

    #[test]
    fn ragged_rows_fail_to_load() {
        let rows = vec![vec![Cell::background(); 3], vec![Cell::background(); 2]];
        match CharGrid::from_rows(rows) {
            Err(PortraitError::RaggedRow { row, expected, found }) => {
                assert_eq!((row, expected, found), (1, 3, 2));
            },
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(CharGrid::from_rows(Vec::new()), Err(PortraitError::EmptyGrid)));
        assert!(matches!(CharGrid::from_json_str("[[]]"), Err(PortraitError::EmptyGrid)));
    }

    #[test]
    fn multi_character_glyph_is_malformed() {
        let json = r#"[[{"char": "ab", "brightness": 1, "isBackground": false}]]"#;
        assert!(matches!(CharGrid::from_json_str(json), Err(PortraitError::Json(_))));
    }

    #[test]
    fn json_output_reloads_identically() {
        let rows = vec![
            vec![Cell::background(), Cell::new('#', 40)],
            vec![Cell::new('.', 230), Cell::background()],
        ];
        let grid = CharGrid::from_rows(rows).unwrap();
        let json = grid.to_json_pretty().unwrap();
        assert!(json.contains("\"isBackground\": true"));
        assert_eq!(CharGrid::from_json_str(&json).unwrap(), grid);
    }

    #[test]
    fn cells_iterate_row_major_with_positions() {
        let rows = vec![
            vec![Cell::new('a', 0), Cell::new('b', 0)],
            vec![Cell::new('c', 0), Cell::new('d', 0)],
        ];
        let grid = CharGrid::from_rows(rows).unwrap();
        let seen: Vec<_> = grid.cells().map(|(x, y, cell)| (x, y, cell.ch)).collect();
        assert_eq!(seen, vec![(0, 0, 'a'), (1, 0, 'b'), (0, 1, 'c'), (1, 1, 'd')]);
        assert_eq!(grid.rows().collect::<Vec<_>>(), vec!["ab", "cd"]);
    }
}
