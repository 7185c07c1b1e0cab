//! Influ - influencer admin panel
//!
//! This library tracks paid brand collaborations with Polish freelance tax
//! breakdowns, retail purchases pending return, short-form video ideas and
//! follower counts across social platforms.

pub mod config;
pub mod db;
pub mod error;
pub mod reports;
pub mod returns;
pub mod tax;
pub mod utils;
