use glam::Vec3A;

use super::Team;
use crate::consts::dropshot;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileState {
    #[default]
    Full,
    Damaged,
    Broken,
}

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropshotTile {
    pub pos: Vec3A,
    pub state: TileState,
}

/// Floor tiles for dropshot, one bank per team half. Tiles sit in
/// hex-offset rows; damage from a charged ball breaks rings of
/// neighboring tiles (1, 7 or 19 tiles for charge levels 1..=3).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropshotTilesState {
    /// Indexed by team: `tiles[Team::Blue as usize]` is the blue half.
    pub tiles: [Vec<DropshotTile>; 2],
}

impl Default for DropshotTilesState {
    fn default() -> Self {
        Self::new()
    }
}

impl DropshotTilesState {
    #[must_use]
    pub fn new() -> Self {
        let blue: Vec<DropshotTile> = tile_positions()
            .map(|pos| DropshotTile {
                pos: pos * Vec3A::new(1.0, -1.0, 1.0),
                state: TileState::Full,
            })
            .collect();

        let orange = blue
            .iter()
            .map(|tile| DropshotTile {
                pos: tile.pos * Vec3A::new(1.0, -1.0, 1.0),
                state: TileState::Full,
            })
            .collect();

        Self {
            tiles: [blue, orange],
        }
    }

    pub fn reset(&mut self) {
        for bank in &mut self.tiles {
            for tile in bank {
                tile.state = TileState::Full;
            }
        }
    }

    /// Damage the tile bank of `team` around `impact_pos`. Charge level
    /// selects the damage ring radius. Returns how many tiles changed
    /// state.
    pub fn apply_damage(&mut self, team: Team, impact_pos: Vec3A, charge_level: i32) -> usize {
        let bank = &mut self.tiles[team as usize];

        let Some(center_idx) = nearest_tile(bank, impact_pos) else {
            return 0;
        };
        let center_pos = bank[center_idx].pos;

        // Ring radius in tile spans: level 1 hits the center tile, each
        // further level adds one ring of neighbors.
        let radius = dropshot::TILE_SPACING_X * (charge_level as f32 - 0.5).max(0.5);
        let radius_sq = radius * radius;

        let mut damaged = 0;
        for tile in bank.iter_mut() {
            let delta = tile.pos - center_pos;
            if delta.x * delta.x + delta.y * delta.y > radius_sq {
                continue;
            }

            let next = match tile.state {
                TileState::Full => TileState::Damaged,
                TileState::Damaged | TileState::Broken => TileState::Broken,
            };
            if next != tile.state {
                tile.state = next;
                damaged += 1;
            }
        }

        damaged
    }
}

impl DropshotTilesState {
    /// Whether the floor directly under `pos` has broken away.
    #[must_use]
    pub fn is_broken_at(&self, pos: Vec3A) -> bool {
        if pos.y.abs() < f32::EPSILON {
            return false;
        }

        let team = if pos.y < 0.0 { Team::Blue } else { Team::Orange };
        let bank = &self.tiles[team as usize];

        let Some(idx) = nearest_tile(bank, pos) else {
            return false;
        };

        let tile = &bank[idx];
        let delta = (tile.pos - pos).truncate();
        tile.state == TileState::Broken
            && delta.length_squared()
                < dropshot::TILE_SPACING_X * dropshot::TILE_SPACING_X * 0.25
    }
}

fn nearest_tile(bank: &[DropshotTile], pos: Vec3A) -> Option<usize> {
    bank.iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            let da = (a.pos - pos).truncate().length_squared();
            let db = (b.pos - pos).truncate().length_squared();
            da.partial_cmp(&db).expect("tile distances must not be NaN")
        })
        .map(|(idx, _)| idx)
}

/// Generator for one half's tile centers, on the positive-Y side.
fn tile_positions() -> impl Iterator<Item = Vec3A> {
    (0..dropshot::NUM_ROWS).flat_map(|row| {
        let row_y = dropshot::FIRST_ROW_Y + row as f32 * dropshot::TILE_SPACING_Y;
        let row_offset_x = if row % 2 == 0 {
            0.0
        } else {
            dropshot::TILE_SPACING_X * 0.5
        };

        (0..dropshot::TILES_PER_ROW).map(move |col| {
            let half_span = (dropshot::TILES_PER_ROW - 1) as f32 * 0.5;
            let x = (col as f32 - half_span) * dropshot::TILE_SPACING_X + row_offset_x;
            Vec3A::new(x, row_y, 0.0)
        })
    })
}
