// Disable console on Windows for non-dev builds.
#![cfg_attr(not(feature = "dev"), windows_subsystem = "windows")]

use bevy::prelude::*;
use clap::Parser;
use snake_duel::soak::SoakRunner;
use snake_duel::{cmdline::Args, AppPlugin};

fn main() -> AppExit {
    let args = Args::parse();
    if args.soak {
        let mut runner = SoakRunner::new(args.soak_ticks);
        runner.run();
        AppExit::Success
    } else {
        App::new().add_plugins(AppPlugin).run()
    }
}
