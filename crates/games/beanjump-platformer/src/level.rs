use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use beanjump_core::error::LoadError;
use beanjump_core::sprite::AssetLibrary;
use beanjump_core::tilemap::{Cell, GridSpec, load_grid};

use crate::config::{BeanJumpConfig, LevelConfig};
use crate::entity::{self, Entity, GroundSkin, PowerUpSkin, TRUCK_SPRITE};

/// The built-in level. `w`, `&` and blanks place nothing.
pub const LEVEL: &[&str] = &[
    "w                                                                                         $w",
    "w                                                                                         $w",
    "w                                                                                         $w",
    "w                                                                                         $w",
    "w                         %                                                               cw",
    "w                   ====                                                                  $w",
    "w                                                %                                        cw",
    "w                                        %       %                                        $w",
    "w               %               %       %%       %                 B       B           B   w",
    "w             %%%              %%     %%%       %                                   t     &w",
    "==================================================== ===========================================",
];

/// Symbols shuffled into each backfill row. Only `d` places a tile.
pub const BACKFILL_POOL: &str = "dddddddddddd[[[[[]]]]].....";

/// One shuffled backfill row (Fisher-Yates over the pool).
pub fn backfill_row(rng: &mut StdRng) -> String {
    let mut symbols: Vec<char> = BACKFILL_POOL.chars().collect();
    symbols.shuffle(rng);
    symbols.into_iter().collect()
}

/// Level rows to instantiate: the configured or built-in grid, followed by
/// `backfill_rows` shuffled dirt rows.
pub fn level_rows(cfg: &LevelConfig) -> Vec<String> {
    let mut rows: Vec<String> = match &cfg.rows {
        Some(rows) => rows.clone(),
        None => LEVEL.iter().map(|r| r.to_string()).collect(),
    };
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    rows.extend((0..cfg.backfill_rows).map(|_| backfill_row(&mut rng)));
    rows
}

/// Instantiate every tile of `rows`. Fails on the first missing sprite.
pub fn build_level<S: AsRef<str>>(
    rows: &[S],
    assets: &AssetLibrary,
    cfg: &BeanJumpConfig,
) -> Result<Vec<Entity>, LoadError> {
    let spec = GridSpec::new(cfg.physics.tile_width, cfg.physics.tile_height);
    let tile = Vec2::new(spec.tile_width, spec.tile_height);
    let entities = load_grid(rows, &spec, |cell| make_tile(cell, tile, assets, cfg))?;
    tracing::info!(rows = rows.len(), entities = entities.len(), "level loaded");
    Ok(entities)
}

fn make_tile(
    cell: Cell,
    tile: Vec2,
    assets: &AssetLibrary,
    cfg: &BeanJumpConfig,
) -> Result<Option<Entity>, LoadError> {
    let pos = cell.pos;
    let entity = match cell.symbol {
        '=' => entity::ground(assets, GroundSkin::Grass, pos, tile)?,
        'd' => entity::ground(assets, GroundSkin::Dirt, pos, tile)?,
        '%' => entity::ground(assets, GroundSkin::Stone, pos, tile)?,
        '$' => entity::power_up(assets, PowerUpSkin::Pretzel, pos, tile)?,
        'c' => entity::power_up(assets, PowerUpSkin::Coffee, pos, tile)?,
        't' => entity::truck(assets.require(TRUCK_SPRITE)?, pos, &cfg.trucks, 1.0),
        'B' => entity::bucket(pos),
        _ => return Ok(None),
    };
    Ok(Some(entity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::fixtures::test_library;
    use crate::entity::Kind;

    fn count(entities: &[Entity], kind: Kind) -> usize {
        entities.iter().filter(|e| e.kind() == kind).count()
    }

    #[test]
    fn builtin_level_contents() {
        let cfg = BeanJumpConfig::default();
        let entities = build_level(LEVEL, &test_library(), &cfg).unwrap();
        assert_eq!(count(&entities, Kind::Bucket), 3);
        assert_eq!(count(&entities, Kind::Truck), 1);
        assert_eq!(count(&entities, Kind::PowerUp), 8);
        // Ground row with one gap, plus the floating ledge.
        assert_eq!(count(&entities, Kind::Grass), 95 + 4);
        assert_eq!(count(&entities, Kind::Ground), 18);
    }

    #[test]
    fn tiles_sit_on_the_grid() {
        let cfg = BeanJumpConfig::default();
        let entities = build_level(&["  B"], &test_library(), &cfg).unwrap();
        assert_eq!(entities[0].body.pos, Vec2::new(64.0, 0.0));
    }

    #[test]
    fn unknown_symbols_are_skipped() {
        let cfg = BeanJumpConfig::default();
        let entities = build_level(&["w&[].x"], &test_library(), &cfg).unwrap();
        assert!(entities.is_empty());
    }

    #[test]
    fn missing_sprite_aborts_load() {
        let cfg = BeanJumpConfig::default();
        let assets = AssetLibrary::new();
        let err = build_level(&["B  ="], &assets, &cfg).unwrap_err();
        assert_eq!(err, LoadError::MissingAsset("grass".into()));
    }

    #[test]
    fn backfill_is_a_permutation_of_the_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let row = backfill_row(&mut rng);
        let mut got: Vec<char> = row.chars().collect();
        let mut want: Vec<char> = BACKFILL_POOL.chars().collect();
        got.sort_unstable();
        want.sort_unstable();
        assert_eq!(got, want);
    }

    #[test]
    fn backfill_is_seeded() {
        let cfg = LevelConfig {
            backfill_rows: 3,
            ..Default::default()
        };
        let a = level_rows(&cfg);
        let b = level_rows(&cfg);
        assert_eq!(a.len(), LEVEL.len() + 3);
        assert_eq!(a, b);
    }

    #[test]
    fn configured_rows_replace_builtin() {
        let cfg = LevelConfig {
            rows: Some(vec!["====".to_string()]),
            ..Default::default()
        };
        assert_eq!(level_rows(&cfg), vec!["====".to_string()]);
    }
}
