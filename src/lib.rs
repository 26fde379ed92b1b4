//! Client for the undocumented Bandcamp fan API.
//!
//! The [`bandcamp`] module fetches a fan's summary, purchased collection and
//! wishlist, and reconciles the split responses into [`bandcamp::Collection`]s.

pub mod bandcamp;
