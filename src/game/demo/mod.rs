// Demo module for the game. Provides a text renderer and an interactive
// terminal loop built only on the public session API.
pub mod game_loop;
pub mod render;
