//! Emit the Lua script that puts the stripped tiles back on a server.
//!
//! The script embeds every original frame in a `mapProtection.map[x][y]`
//! table and replays them with `settile` when the server loads it.

use std::fs;
use std::io;
use std::path::Path;

use crate::model::Grid;
use crate::model::grid::span;

const GENERATOR: &str = "    generateMap = function()
        for x = 0, map'xsize' do
            for y = 0, map'ysize' do
                parse('settile '.. x ..' '.. y ..' '.. mapProtection.map[x][y])
            end
        end
    end;
}

mapProtection.generateMap()";

/// Render the script for a `0..=width` × `0..=height` map. Must be given the
/// frames from before the map was stripped.
pub fn render(width: i32, height: i32, frames: &Grid<u8>) -> String {
    let (columns, rows) = (span(width), span(height));
    let mut out = String::with_capacity(64 + columns * (24 + rows * 24) + GENERATOR.len());

    out.push_str("mapProtection = {\n");
    out.push_str("    map = {\n");
    for x in 0..columns {
        out.push_str(&format!("        [{x}] = {{\n"));
        for y in 0..rows {
            let frame = frames.get(x, y).copied().unwrap_or(0);
            out.push_str(&format!("            [{y}] = {frame};\n"));
        }
        out.push_str("        };\n");
    }
    out.push_str("    };\n\n");
    out.push_str(GENERATOR);
    out
}

pub fn emit(script: &str, path: &Path) -> io::Result<()> {
    fs::write(path, script)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_small_map() {
        let frames = Grid::from_cells(2, 1, vec![5u8, 17]).unwrap();
        let script = render(1, 0, &frames);

        let expected = "mapProtection = {
    map = {
        [0] = {
            [0] = 5;
        };
        [1] = {
            [0] = 17;
        };
    };

    generateMap = function()
        for x = 0, map'xsize' do
            for y = 0, map'ysize' do
                parse('settile '.. x ..' '.. y ..' '.. mapProtection.map[x][y])
            end
        end
    end;
}

mapProtection.generateMap()";
        assert_eq!(script, expected);
    }

    #[test]
    fn test_render_lists_every_cell() {
        let frames: Grid<u8> = Grid::spanning(9, 4);
        let script = render(9, 4, &frames);

        assert_eq!(script.matches("] = 0;").count(), 50);
        assert!(script.contains("        [9] = {\n"));
        assert!(!script.ends_with('\n'));
    }
}
