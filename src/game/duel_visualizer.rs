//! Keyboard steering and the tilemap view of the playfield.
//!
//! The simulation itself lives in [`crate::duel_game`] and knows nothing
//! about Bevy; this module records just-pressed keys into steering intents,
//! advances the game once per frame, and mirrors the resulting grid state
//! into a `bevy_ecs_tilemap` layer.

use bevy::prelude::*;
use bevy_ecs_tilemap::map::TilemapId;
use bevy_ecs_tilemap::map::TilemapSize;
use bevy_ecs_tilemap::map::TilemapTexture;
use bevy_ecs_tilemap::map::TilemapTileSize;
use bevy_ecs_tilemap::map::TilemapType;
use bevy_ecs_tilemap::prelude::get_tilemap_center_transform;
use bevy_ecs_tilemap::tiles::TileBundle;
use bevy_ecs_tilemap::tiles::TilePos;
use bevy_ecs_tilemap::tiles::TileStorage;
use bevy_ecs_tilemap::tiles::TileTextureIndex;
use bevy_ecs_tilemap::TilemapBundle;
use bevy_ecs_tilemap::TilemapPlugin;

use crate::duel_game::{self, DuelGame, Player};
use crate::game::assets::{HandleMap, ImageKey};
use crate::AppSet;

#[derive(Reflect, Copy, Clone, PartialEq, Eq)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub fn to_game_direction(self) -> duel_game::Direction {
        match self {
            Dir::Up => duel_game::Direction::Up,
            Dir::Down => duel_game::Direction::Down,
            Dir::Left => duel_game::Direction::Left,
            Dir::Right => duel_game::Direction::Right,
        }
    }
}

/// Which keys steer which player. The mapping is deliberately a plain table:
/// swap entries here to change who gets the arrows and who gets WASD.
pub struct ControlScheme {
    pub player: Player,
    pub left: KeyCode,
    pub right: KeyCode,
    pub up: KeyCode,
    pub down: KeyCode,
}

pub const CONTROLS: [ControlScheme; 2] = [
    ControlScheme {
        player: Player::One,
        left: KeyCode::ArrowLeft,
        right: KeyCode::ArrowRight,
        up: KeyCode::ArrowUp,
        down: KeyCode::ArrowDown,
    },
    ControlScheme {
        player: Player::Two,
        left: KeyCode::KeyA,
        right: KeyCode::KeyD,
        up: KeyCode::KeyW,
        down: KeyCode::KeyS,
    },
];

pub const RESET_KEY: KeyCode = KeyCode::Escape;

/// Per-frame steering intents, one slot per player, plus the reset request.
/// Only just-pressed transitions land here; held keys do nothing.
#[derive(Component, Reflect, Default)]
#[reflect(Component)]
pub struct SteeringController {
    intents: [Option<Dir>; 2],
    reset: bool,
}

/// The simulation, owned by a single entity on the Bevy side.
#[derive(Component)]
pub struct DuelSession(pub DuelGame);

fn record_steering(
    input: Res<ButtonInput<KeyCode>>,
    mut controller_query: Query<&mut SteeringController>,
) {
    let mut intents = [None; 2];
    for scheme in &CONTROLS {
        let mut intent = None;
        if input.just_pressed(scheme.left) {
            intent = Some(Dir::Left);
        } else if input.just_pressed(scheme.right) {
            intent = Some(Dir::Right);
        } else if input.just_pressed(scheme.down) {
            intent = Some(Dir::Down);
        } else if input.just_pressed(scheme.up) {
            intent = Some(Dir::Up);
        }
        intents[scheme.player.index()] = intent;
    }
    let reset = input.just_pressed(RESET_KEY);

    for mut controller in &mut controller_query {
        controller.intents = intents;
        controller.reset = reset;
    }
}

pub(super) fn plugin(app: &mut App) {
    // Register (i.e. record) what steering the players take via keyboard.
    app.register_type::<SteeringController>();
    app.add_systems(Update, record_steering.in_set(AppSet::RecordInput));

    // Advance the simulation, then mirror it into the tilemap.
    app.add_systems(
        Update,
        (advance_game, update_playfield).chain().in_set(AppSet::Update),
    );

    app.add_plugins(TilemapPlugin);

    app.add_systems(Startup, spawn_playfield);
}

/// What a grid cell shows, and the tile texture index for it.
#[derive(Copy, Clone, PartialEq, Eq)]
enum TileKind {
    Food,
    SnakeOne,
    SnakeTwo,
}

fn tile_texture_index_of(kind: TileKind) -> u32 {
    match kind {
        TileKind::Food => 0,
        TileKind::SnakeOne => 1,
        TileKind::SnakeTwo => 2,
    }
}

/// Grid cells use y-down coordinates; the tilemap is y-up.
fn tile_pos_of_cell(x: i16, y: i16) -> TilePos {
    TilePos {
        x: x as u32,
        y: (DuelGame::GRID_HEIGHT - 1 - y) as u32,
    }
}

/// Flat per-cell view of the game, indexed `y * width + x`. Segments the
/// simulation has committed out of bounds (crash pending) are skipped.
fn occupancy(game: &DuelGame) -> Vec<Option<TileKind>> {
    let width = DuelGame::GRID_WIDTH as usize;
    let height = DuelGame::GRID_HEIGHT as usize;
    let mut cells = vec![None; width * height];
    let mut set = |pt: duel_game::GridPoint, kind: TileKind| {
        if DuelGame::is_in_bounds(pt) {
            cells[pt.y as usize * width + pt.x as usize] = Some(kind);
        }
    };
    set(game.food, TileKind::Food);
    for &pt in &game.snakes[0].segments {
        set(pt, TileKind::SnakeOne);
    }
    for &pt in &game.snakes[1].segments {
        set(pt, TileKind::SnakeTwo);
    }
    cells
}

/// Cells as drawn last frame, so only changed tiles are touched.
#[derive(Component)]
struct LastDrawn(Vec<Option<TileKind>>);

fn spawn_playfield(mut commands: Commands, image_handles: Res<HandleMap<ImageKey>>) {
    let map_size = TilemapSize {
        x: DuelGame::GRID_WIDTH as u32,
        y: DuelGame::GRID_HEIGHT as u32,
    };
    let tile_storage = TileStorage::empty(map_size);
    let map_type = TilemapType::Square;
    let tile_pixel_size = TilemapTileSize {
        x: DuelGame::CELL_SIZE as f32,
        y: DuelGame::CELL_SIZE as f32,
    };
    let grid_size = tile_pixel_size.into();
    commands.spawn((
        Name::new("Playfield"),
        TilemapBundle {
            grid_size,
            size: map_size,
            storage: tile_storage,
            map_type,
            texture: TilemapTexture::Single(image_handles[&ImageKey::DuelTiles].clone_weak()),
            tile_size: tile_pixel_size,
            transform: get_tilemap_center_transform(&map_size, &grid_size, &map_type, 0.0),
            ..Default::default()
        },
    ));

    let game = DuelGame::new();
    let cell_count = DuelGame::GRID_WIDTH as usize * DuelGame::GRID_HEIGHT as usize;
    commands.spawn((
        Name::new("Duel session"),
        DuelSession(game),
        LastDrawn(vec![None; cell_count]),
        SteeringController::default(),
    ));
}

fn advance_game(mut session_query: Query<(&mut DuelSession, &SteeringController)>) {
    for (mut session, controller) in &mut session_query {
        let game = &mut session.0;
        if controller.reset {
            game.reset();
        }
        for player in Player::BOTH {
            if let Some(dir) = controller.intents[player.index()] {
                game.steer(player, dir.to_game_direction());
            }
        }
        game.update(None);
    }
}

fn update_playfield(
    mut commands: Commands,
    mut session_query: Query<(&DuelSession, &mut LastDrawn)>,
    mut tilemap_query: Query<(&mut TileStorage, Entity)>,
    mut tile_texture_query: Query<&mut TileTextureIndex>,
) {
    let Ok((session, mut last_drawn)) = session_query.get_single_mut() else {
        return;
    };
    let Ok((mut tile_storage, tilemap_entity)) = tilemap_query.get_single_mut() else {
        return;
    };

    let width = DuelGame::GRID_WIDTH as usize;
    let current = occupancy(&session.0);
    for (i, (&kind, &drawn)) in current.iter().zip(last_drawn.0.iter()).enumerate() {
        if kind == drawn {
            continue;
        }
        let tile_position = tile_pos_of_cell((i % width) as i16, (i / width) as i16);
        let tile = tile_storage.get(&tile_position);
        match (kind, tile) {
            (None, None) => { /* Nothing to do. (Shouldn't happen.) */ }
            (None, Some(tile)) => {
                // Remove from Tilemap
                tile_storage.remove(&tile_position);
                commands.entity(tile).despawn();
            }
            (Some(kind), None) => {
                // Create new tile entity
                let tile_entity = commands
                    .spawn(TileBundle {
                        position: tile_position,
                        tilemap_id: TilemapId(tilemap_entity),
                        ..Default::default()
                    })
                    .insert(TileTextureIndex(tile_texture_index_of(kind)))
                    .id();
                // Add tile entity to Tilemap
                tile_storage.set(&tile_position, tile_entity);
            }
            (Some(kind), Some(tile)) => {
                // Change texture of tile already in Tilemap
                if let Ok(mut tile_texture_index) = tile_texture_query.get_mut(tile) {
                    tile_texture_index.0 = tile_texture_index_of(kind);
                }
            }
        }
    }
    last_drawn.0 = current;
}
