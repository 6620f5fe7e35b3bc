//! Terminal front end: an Elm-style event loop over three views
//! (create, review, search).

pub mod app;
pub mod events;
pub mod layout;
pub mod services;
pub mod theme;
pub mod views;
pub mod widgets;
