use bevy::prelude::*;
use cellflow::math::lerp;
use cellflow::{
    Brush, BrushMode, Cell, FlowError, FlowParams, LiquidPlugin, LiquidState, Real, coord,
};
use rand::Rng;

const GRID_WIDTH: u32 = 96;
const GRID_HEIGHT: u32 = 64;
const CELL_SIZE: f32 = 8.0;

const SOLID_COLOR: [f32; 3] = [0.12, 0.12, 0.14];
const THIN_COLOR: [f32; 3] = [0.85, 1.0, 1.0];
const FULL_COLOR: [f32; 3] = [0.0, 0.85, 0.9];
const DEEP_COLOR: [f32; 3] = [0.0, 0.35, 0.45];

#[derive(Component)]
struct CellSprite {
    index: usize,
}

#[derive(Component)]
struct HudText;

#[derive(Resource, Default)]
struct PresetCursor(usize);

#[derive(Resource, Default)]
struct Rain(bool);

// Grid rows grow downward, world y grows upward.
fn cell_to_world(position: IVec2) -> Vec3 {
    Vec3::new(
        (position.x as f32 - GRID_WIDTH as f32 / 2.0 + 0.5) * CELL_SIZE,
        (GRID_HEIGHT as f32 / 2.0 - position.y as f32 - 0.5) * CELL_SIZE,
        0.0,
    )
}

fn world_to_cell(position: Vec2) -> IVec2 {
    IVec2::new(
        (position.x / CELL_SIZE + GRID_WIDTH as f32 / 2.0).floor() as i32,
        (GRID_HEIGHT as f32 / 2.0 - position.y / CELL_SIZE).floor() as i32,
    )
}

fn cell_color(cell: &Cell, max_liquid: Real) -> Color {
    if cell.is_solid() {
        return Color::srgb(SOLID_COLOR[0], SOLID_COLOR[1], SOLID_COLOR[2]);
    }

    let fill = cell.liquid() / max_liquid;
    if fill <= 0.0 {
        return Color::NONE;
    }

    let (from, to, t) = if fill < 1.0 {
        (THIN_COLOR, FULL_COLOR, fill)
    } else {
        (FULL_COLOR, DEEP_COLOR, (fill - 1.0).min(1.0))
    };
    Color::srgba(
        lerp(from[0], to[0], t),
        lerp(from[1], to[1], t),
        lerp(from[2], to[2], t),
        fill.clamp(0.3, 1.0),
    )
}

fn init(mut commands: Commands, mut state: ResMut<LiquidState>) {
    commands.spawn(Camera2d);

    let grid = state.grid();
    for index in 0..grid.len() {
        commands.spawn((
            CellSprite { index },
            Sprite::from_color(Color::NONE, Vec2::splat(CELL_SIZE)),
            Transform::from_translation(cell_to_world(grid.coord_of(index))),
        ));
    }

    // A block of water to start with
    for x in 8..24 {
        for y in 4..20 {
            if let Err(err) = state.add_liquid(coord(x, y), 1.0) {
                warn!("initial pour: {err}");
            }
        }
    }
}

fn setup_hud(mut commands: Commands) {
    commands.spawn((
        Text::default(),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        HudText,
    ));
}

fn controls(
    keys: Res<ButtonInput<KeyCode>>,
    mut brush: ResMut<Brush>,
    mut rain: ResMut<Rain>,
    mut preset: ResMut<PresetCursor>,
    mut state: ResMut<LiquidState>,
) {
    if keys.just_pressed(KeyCode::Space) {
        brush.toggle_mode();
    }
    if keys.pressed(KeyCode::ArrowUp) {
        brush.adjust_amount(0.1);
    } else if keys.pressed(KeyCode::ArrowDown) {
        brush.adjust_amount(-0.1);
    }
    if keys.just_pressed(KeyCode::KeyR) {
        rain.0 = !rain.0;
    }
    if keys.just_pressed(KeyCode::KeyP) {
        let presets = FlowParams::presets();
        preset.0 = (preset.0 + 1) % presets.len();
        if let Some((name, params)) = presets.get_index(preset.0) {
            match state.set_params(params.clone()) {
                Ok(()) => info!("switched to {name} flow preset"),
                Err(err) => warn!("preset {name} rejected: {err}"),
            }
        }
    }
}

fn paint(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    brush: Res<Brush>,
    mut state: ResMut<LiquidState>,
) {
    let erasing = mouse.pressed(MouseButton::Right);
    if !erasing && !mouse.pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Ok(world_pos) = camera.viewport_to_world_2d(camera_transform, cursor_pos) else {
        return;
    };

    let target = world_to_cell(world_pos);
    if !state.grid().contains(target) {
        return;
    }

    let result = if erasing {
        let mut eraser = (*brush).clone();
        eraser.mode = BrushMode::Erase;
        eraser.apply(&mut state, target)
    } else {
        brush.apply(&mut state, target)
    };
    if let Err(err) = result {
        warn!("brush rejected at {target}: {err}");
    }
}

fn rain(rain: Res<Rain>, mut state: ResMut<LiquidState>) {
    if !rain.0 {
        return;
    }
    let mut rng = rand::rng();
    let width = state.grid().width() as i32;
    let x = rng.random_range(1..width - 1);
    let amount = rng.random_range(0.2..=1.0);
    match state.add_liquid(coord(x, 1), amount) {
        // Drops landing on a painted wall are lost.
        Ok(()) | Err(FlowError::SolidTarget { .. }) => {}
        Err(err) => warn!("rain: {err}"),
    }
}

fn sync_sprites(state: Res<LiquidState>, mut sprites: Query<(&CellSprite, &mut Sprite)>) {
    let cells = state.grid().cells();
    let max_liquid = state.params().max_liquid;
    for (cell_sprite, mut sprite) in sprites.iter_mut() {
        if let Some(cell) = cells.get(cell_sprite.index) {
            sprite.color = cell_color(cell, max_liquid);
        }
    }
}

fn update_hud(
    state: Res<LiquidState>,
    brush: Res<Brush>,
    rain: Res<Rain>,
    preset: Res<PresetCursor>,
    mut query: Query<&mut Text, With<HudText>>,
) {
    let presets = FlowParams::presets();
    let preset_name = presets
        .get_index(preset.0)
        .map(|(name, _)| *name)
        .unwrap_or("custom");
    let stats = state.last_stats();

    for mut text in &mut query {
        text.0 = format!(
            "(Space) Brush: {}\n(Up/Down) Amount: {:.1}\n(R) Rain: {}\n(P) Preset: {}\nTotal liquid: {:.2}\nAwake cells: {}\nMoved last step: {:.3}",
            brush.mode.label(),
            brush.amount(),
            if rain.0 { "on" } else { "off" },
            preset_name,
            state.total_fluid_quantity(),
            state.awake_cell_count(),
            stats.transferred,
        );
    }
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(LiquidPlugin {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            ..default()
        })
        .init_resource::<Brush>()
        .init_resource::<PresetCursor>()
        .init_resource::<Rain>()
        .add_systems(Startup, (init, setup_hud))
        .add_systems(
            Update,
            (controls, paint, rain, sync_sprites, update_hud).chain(),
        )
        .run();
}
