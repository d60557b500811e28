//! Genre (event type) model.
//!
//! Genres are user-defined named color tags. Each calendar holds at most
//! [`MAX_GENRES_PER_CALENDAR`] genres and no two genres share a color.
//! Events copy the genre color when saved and never reference the genre
//! afterwards, so recoloring or deleting a genre leaves existing events as
//! they were.

use serde::{Deserialize, Serialize};

use crate::models::event::DEFAULT_EVENT_COLOR;

/// Maximum number of genres a single calendar may hold.
pub const MAX_GENRES_PER_CALENDAR: usize = 10;

/// Maximum length of a genre name, in characters.
pub const MAX_GENRE_NAME_LEN: usize = 20;

/// The fixed palette genre colors are drawn from.
pub const GENRE_PALETTE: [&str; 10] = [
    "#3B82F6", // blue
    "#EF4444", // red
    "#10B981", // green
    "#F59E0B", // amber
    "#8B5CF6", // purple
    "#EC4899", // pink
    "#14B8A6", // teal
    "#F97316", // orange
    "#6366F1", // indigo
    "#22D3EE", // cyan
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl Genre {
    /// Create a genre with a fresh id.
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            color: color.into(),
        }
    }

    pub fn validate(&self) -> Result<(), GenreValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(GenreValidationError::EmptyName);
        }
        if name.chars().count() > MAX_GENRE_NAME_LEN {
            return Err(GenreValidationError::NameTooLong);
        }
        if !GENRE_PALETTE.contains(&self.color.as_str()) {
            return Err(GenreValidationError::ColorNotInPalette);
        }
        Ok(())
    }
}

/// Validation errors for genres.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenreValidationError {
    EmptyName,
    NameTooLong,
    ColorNotInPalette,
    ColorInUse,
    LimitReached,
}

impl std::fmt::Display for GenreValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Genre name cannot be empty"),
            Self::NameTooLong => write!(
                f,
                "Genre name must be {} characters or less",
                MAX_GENRE_NAME_LEN
            ),
            Self::ColorNotInPalette => write!(f, "Genre color must come from the palette"),
            Self::ColorInUse => write!(f, "Another genre already uses this color"),
            Self::LimitReached => write!(
                f,
                "A calendar can have at most {} genres",
                MAX_GENRES_PER_CALENDAR
            ),
        }
    }
}

impl std::error::Error for GenreValidationError {}

/// The genres of one calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreRegistry {
    genres: Vec<Genre>,
}

impl GenreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already-persisted genres without re-checking limits.
    pub fn from_genres(genres: Vec<Genre>) -> Self {
        Self { genres }
    }

    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    /// Palette colors not yet taken by a genre.
    pub fn available_colors(&self) -> Vec<&'static str> {
        GENRE_PALETTE
            .iter()
            .copied()
            .filter(|color| !self.genres.iter().any(|g| g.color == *color))
            .collect()
    }

    /// Check that `genre` could be added.
    pub fn check_add(&self, genre: &Genre) -> Result<(), GenreValidationError> {
        genre.validate()?;
        if self.genres.len() >= MAX_GENRES_PER_CALENDAR {
            return Err(GenreValidationError::LimitReached);
        }
        if self.genres.iter().any(|g| g.color == genre.color) {
            return Err(GenreValidationError::ColorInUse);
        }
        Ok(())
    }

    pub fn add(&mut self, genre: Genre) -> Result<(), GenreValidationError> {
        self.check_add(&genre)?;
        self.genres.push(genre);
        Ok(())
    }

    /// Remove a genre. Unknown ids are ignored.
    pub fn remove(&mut self, id: &str) -> Option<Genre> {
        let index = self.genres.iter().position(|g| g.id == id)?;
        Some(self.genres.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&Genre> {
        self.genres.iter().find(|g| g.id == id)
    }

    /// Color for an event tagged with `genre_id`.
    ///
    /// An empty id or one that matches no genre yields [`DEFAULT_EVENT_COLOR`].
    pub fn color_for(&self, genre_id: &str) -> &str {
        if genre_id.is_empty() {
            return DEFAULT_EVENT_COLOR;
        }
        self.get(genre_id)
            .map(|g| g.color.as_str())
            .unwrap_or(DEFAULT_EVENT_COLOR)
    }
}
