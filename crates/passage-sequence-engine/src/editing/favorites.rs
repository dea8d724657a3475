//! Favourite command kinds for the "add command" menu.
//!
//! Storage lives behind [`FavoritesRepository`] so the editing core never
//! touches a file or settings store itself.

use crate::models::CommandKind;

pub trait FavoritesRepository {
    fn load(&self) -> anyhow::Result<Vec<CommandKind>>;
    fn save(&mut self, favorites: &[CommandKind]) -> anyhow::Result<()>;
}

/// Repository that only lives as long as the process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryFavorites {
    favorites: Vec<CommandKind>,
}

impl MemoryFavorites {
    pub fn new(favorites: Vec<CommandKind>) -> Self {
        Self { favorites }
    }
}

impl FavoritesRepository for MemoryFavorites {
    fn load(&self) -> anyhow::Result<Vec<CommandKind>> {
        Ok(self.favorites.clone())
    }

    fn save(&mut self, favorites: &[CommandKind]) -> anyhow::Result<()> {
        self.favorites = favorites.to_vec();
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub kind: CommandKind,
    pub favorite: bool,
}

/// The command kinds offered to authors, favourites first
pub struct CommandMenu<R: FavoritesRepository> {
    repository: R,
    favorites: Vec<CommandKind>,
}

impl<R: FavoritesRepository> CommandMenu<R> {
    /// Load favourites from `repository`; unreadable favourites start empty
    pub fn new(repository: R) -> Self {
        let mut favorites = repository.load().unwrap_or_else(|e| {
            log::warn!("Could not load favourite commands: {e}");
            Vec::new()
        });
        let mut seen = std::collections::HashSet::new();
        favorites.retain(|kind| seen.insert(*kind));
        Self {
            repository,
            favorites,
        }
    }

    pub fn favorites(&self) -> &[CommandKind] {
        &self.favorites
    }

    pub fn is_favorite(&self, kind: CommandKind) -> bool {
        self.favorites.contains(&kind)
    }

    /// Favourites in the order they were added, then every other kind
    pub fn entries(&self) -> Vec<MenuEntry> {
        let favorites = self.favorites.iter().map(|&kind| MenuEntry {
            kind,
            favorite: true,
        });
        let others = CommandKind::ALL
            .into_iter()
            .filter(|kind| !self.is_favorite(*kind))
            .map(|kind| MenuEntry {
                kind,
                favorite: false,
            });
        favorites.chain(others).collect()
    }

    /// Flip `kind` in or out of the favourites and save. Returns the new state.
    ///
    /// On a failed save the in-memory list is rolled back.
    pub fn toggle_favorite(&mut self, kind: CommandKind) -> anyhow::Result<bool> {
        let previous = self.favorites.clone();
        let now_favorite = if let Some(pos) = self.favorites.iter().position(|k| *k == kind) {
            self.favorites.remove(pos);
            false
        } else {
            self.favorites.push(kind);
            true
        };
        if let Err(e) = self.repository.save(&self.favorites) {
            self.favorites = previous;
            return Err(e);
        }
        Ok(now_favorite)
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}
