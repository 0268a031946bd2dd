//! UI Components

pub mod card;

pub use card::Card;
