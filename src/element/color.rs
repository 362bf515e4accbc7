//! Colour and random-choice filters.
//!
//! Filters join their arguments and decorate the result:
//! `{{cyan "building"}}`, `{{cycle . "|" "/" | rndcolor}}`,
//! `{{rnd "a" "b" "c"}}`. Colouring goes through `console`, so it is
//! switched off automatically when the output is not a terminal.

use super::Filter;
use console::{style, Color};
use rand::seq::IndexedRandom;
use std::sync::Arc;

const RANDOM_PALETTE: [Color; 7] = [
    Color::Black,
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
];

/// All built-in filters with their template names.
pub fn filters() -> Vec<(&'static str, Arc<Filter>)> {
    vec![
        ("black", paint(Color::Black)),
        ("red", paint(Color::Red)),
        ("green", paint(Color::Green)),
        ("yellow", paint(Color::Yellow)),
        ("blue", paint(Color::Blue)),
        ("magenta", paint(Color::Magenta)),
        ("cyan", paint(Color::Cyan)),
        ("white", paint(Color::White)),
        ("resetcolor", Arc::new(reset_color) as Arc<Filter>),
        ("rndcolor", Arc::new(random_color) as Arc<Filter>),
        ("rnd", Arc::new(random_choice) as Arc<Filter>),
    ]
}

fn paint(color: Color) -> Arc<Filter> {
    Arc::new(move |args: &[String]| style(args.concat()).fg(color).to_string())
}

/// Remove any colouring from the joined arguments.
pub fn reset_color(args: &[String]) -> String {
    console::strip_ansi_codes(&args.concat()).into_owned()
}

/// Colour the joined arguments with a random palette colour.
pub fn random_color(args: &[String]) -> String {
    let color = RANDOM_PALETTE
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(Color::White);
    style(args.concat()).fg(color).to_string()
}

/// One of the arguments at random, empty when there are none.
pub fn random_choice(args: &[String]) -> String {
    args.choose(&mut rand::rng()).cloned().unwrap_or_default()
}
