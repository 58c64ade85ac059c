#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    clip_it_prefs_lib::run();
}
