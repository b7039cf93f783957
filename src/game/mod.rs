//! Game mechanics and content.

use bevy::prelude::*;

pub mod assets;
pub mod duel_visualizer;
pub mod hud;

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        assets::plugin,

        duel_visualizer::plugin,
        hud::plugin,
    ));
}
