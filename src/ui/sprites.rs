// Slime idle animation: four 16×9 frames, one bounce cycle.
//
// '#' = lit pixel. Frames are packed to XBM by `AnimationTable::from_art`.

use crate::domain::sprite::AnimationTable;

pub const SLIME_WIDTH: i32 = 16;
pub const SLIME_HEIGHT: i32 = 9;

const REST: &[&str] = &[
    "................",
    "......####......",
    "....##....##....",
    "...#........#...",
    "..#..#....#..#..",
    "..#..........#..",
    ".#....#..#....#.",
    ".#.....##.....#.",
    "..############..",
];

const SQUASH: &[&str] = &[
    "................",
    "................",
    ".....######.....",
    "...##......##...",
    "..#..#....#..#..",
    ".#............#.",
    "#.....#..#.....#",
    "#......##......#",
    ".##############.",
];

const STRETCH: &[&str] = &[
    ".......##.......",
    ".....##..##.....",
    "....#......#....",
    "...#.#....#.#...",
    "...#........#...",
    "..#...#..#...#..",
    "..#....##....#..",
    "..#..........#..",
    "...##########...",
];

pub fn slime_idle() -> AnimationTable {
    AnimationTable::from_art(SLIME_WIDTH, SLIME_HEIGHT, &[REST, SQUASH, REST, STRETCH])
}
