use sqlx::SqlitePool;
use std::collections::HashMap;
use thiserror::Error;
use tracing::info;

use crate::dto::character_dto::{Character, UpdateCharacter};
use crate::dto::weapon_dto::{UpdateWeapon, Weapon};

pub const MAX_CONSTELLATION: i64 = 6;
pub const MIN_REFINEMENT: i64 = 1;
pub const MAX_REFINEMENT: i64 = 5;
pub const MAX_LEVEL: i64 = 90;

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("{kind} '{id}' was not found")]
    NotFound { kind: &'static str, id: String },

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Read access the scorer needs.
pub trait CatalogueLookup {
    fn character(&self, id: &str) -> Option<&Character>;
    fn weapon(&self, id: &str) -> Option<&Weapon>;
}

/// Point-in-time copy of the catalogue.
#[derive(Debug, Default, Clone)]
pub struct CatalogueSnapshot {
    characters: HashMap<String, Character>,
    weapons: HashMap<String, Weapon>,
}

impl CatalogueSnapshot {
    pub fn new(characters: Vec<Character>, weapons: Vec<Weapon>) -> Self {
        Self {
            characters: characters.into_iter().map(|c| (c.id.clone(), c)).collect(),
            weapons: weapons.into_iter().map(|w| (w.id.clone(), w)).collect(),
        }
    }
}

impl CatalogueLookup for CatalogueSnapshot {
    fn character(&self, id: &str) -> Option<&Character> {
        self.characters.get(id)
    }

    fn weapon(&self, id: &str) -> Option<&Weapon> {
        self.weapons.get(id)
    }
}

fn check_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), CatalogueError> {
    if value < min || value > max {
        return Err(CatalogueError::Validation(format!(
            "{} must be between {} and {}, got {}",
            field, min, max, value
        )));
    }
    Ok(())
}

fn validate_character(character: &Character) -> Result<(), CatalogueError> {
    check_range("level", character.level, 1, MAX_LEVEL)?;
    check_range("constellation_level", character.constellation_level, 0, MAX_CONSTELLATION)
}

fn validate_weapon(weapon: &Weapon) -> Result<(), CatalogueError> {
    check_range("level", weapon.level, 1, MAX_LEVEL)?;
    check_range("refinement_level", weapon.refinement_level, MIN_REFINEMENT, MAX_REFINEMENT)
}

#[derive(Clone)]
pub struct SqliteCatalogue {
    pool: SqlitePool,
}

impl SqliteCatalogue {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_characters(&self) -> Result<Vec<Character>, CatalogueError> {
        let characters = sqlx::query_as::<_, Character>("SELECT * FROM characters ORDER BY rarity DESC, name")
            .fetch_all(&self.pool)
            .await?;
        Ok(characters)
    }

    pub async fn get_character_by_id(&self, id: &str) -> Result<Character, CatalogueError> {
        sqlx::query_as::<_, Character>("SELECT * FROM characters WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CatalogueError::NotFound { kind: "Character", id: id.to_string() })
    }

    /// The weapon has to exist and match the character's weapon type.
    async fn check_equip(&self, character: &Character, weapon_id: &str) -> Result<(), CatalogueError> {
        let weapon = self.get_weapon_by_id(weapon_id).await?;
        if weapon.weapon_type != character.weapon_type {
            return Err(CatalogueError::Validation(format!(
                "{} cannot equip a {}",
                character.name, weapon.weapon_type
            )));
        }
        Ok(())
    }

    pub async fn upsert_character(&self, character: &Character) -> Result<(), CatalogueError> {
        validate_character(character)?;
        if let Some(weapon_id) = &character.equipped_weapon_id {
            self.check_equip(character, weapon_id).await?;
        }

        let mut tx = self.pool.begin().await?;

        if let Some(weapon_id) = &character.equipped_weapon_id {
            sqlx::query("UPDATE characters SET equipped_weapon_id = NULL WHERE equipped_weapon_id = ? AND id != ?")
                .bind(weapon_id)
                .bind(&character.id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO characters (id, name, rarity, element, weapon_type, owned, level, constellation_level, equipped_weapon_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                rarity = excluded.rarity,
                element = excluded.element,
                weapon_type = excluded.weapon_type,
                owned = excluded.owned,
                level = excluded.level,
                constellation_level = excluded.constellation_level,
                equipped_weapon_id = excluded.equipped_weapon_id
            "#,
        )
        .bind(&character.id)
        .bind(&character.name)
        .bind(character.rarity)
        .bind(&character.element)
        .bind(&character.weapon_type)
        .bind(character.owned)
        .bind(character.level)
        .bind(character.constellation_level)
        .bind(&character.equipped_weapon_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        info!("Saved character {}", character.id);
        Ok(())
    }

    /// Applies a partial update. Equipping a weapon another character holds
    /// moves it.
    pub async fn update_character(&self, id: &str, update: &UpdateCharacter) -> Result<Character, CatalogueError> {
        let mut character = self.get_character_by_id(id).await?;

        if let Some(owned) = update.owned {
            character.owned = owned;
        }
        if let Some(level) = update.level {
            character.level = level;
        }
        if let Some(constellation_level) = update.constellation_level {
            character.constellation_level = constellation_level;
        }
        validate_character(&character)?;

        if let Some(Some(weapon_id)) = &update.equipped_weapon_id {
            self.check_equip(&character, weapon_id).await?;
        }

        let mut tx = self.pool.begin().await?;

        if let Some(equipped) = &update.equipped_weapon_id {
            if let Some(weapon_id) = equipped {
                sqlx::query("UPDATE characters SET equipped_weapon_id = NULL WHERE equipped_weapon_id = ? AND id != ?")
                    .bind(weapon_id)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
            }
            character.equipped_weapon_id = equipped.clone();
        }

        sqlx::query(
            r#"
            UPDATE characters
            SET owned = ?, level = ?, constellation_level = ?, equipped_weapon_id = ?
            WHERE id = ?
            "#,
        )
        .bind(character.owned)
        .bind(character.level)
        .bind(character.constellation_level)
        .bind(&character.equipped_weapon_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(character)
    }

    pub async fn list_weapons(&self) -> Result<Vec<Weapon>, CatalogueError> {
        let weapons = sqlx::query_as::<_, Weapon>("SELECT * FROM weapons ORDER BY rarity DESC, name")
            .fetch_all(&self.pool)
            .await?;
        Ok(weapons)
    }

    pub async fn get_weapon_by_id(&self, id: &str) -> Result<Weapon, CatalogueError> {
        sqlx::query_as::<_, Weapon>("SELECT * FROM weapons WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CatalogueError::NotFound { kind: "Weapon", id: id.to_string() })
    }

    pub async fn upsert_weapon(&self, weapon: &Weapon) -> Result<(), CatalogueError> {
        validate_weapon(weapon)?;

        sqlx::query(
            r#"
            INSERT INTO weapons (id, name, rarity, weapon_type, owned, level, refinement_level)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                rarity = excluded.rarity,
                weapon_type = excluded.weapon_type,
                owned = excluded.owned,
                level = excluded.level,
                refinement_level = excluded.refinement_level
            "#,
        )
        .bind(&weapon.id)
        .bind(&weapon.name)
        .bind(weapon.rarity)
        .bind(&weapon.weapon_type)
        .bind(weapon.owned)
        .bind(weapon.level)
        .bind(weapon.refinement_level)
        .execute(&self.pool)
        .await?;

        info!("Saved weapon {}", weapon.id);
        Ok(())
    }

    pub async fn update_weapon(&self, id: &str, update: &UpdateWeapon) -> Result<Weapon, CatalogueError> {
        let mut weapon = self.get_weapon_by_id(id).await?;

        if let Some(owned) = update.owned {
            weapon.owned = owned;
        }
        if let Some(level) = update.level {
            weapon.level = level;
        }
        if let Some(refinement_level) = update.refinement_level {
            weapon.refinement_level = refinement_level;
        }
        validate_weapon(&weapon)?;

        sqlx::query("UPDATE weapons SET owned = ?, level = ?, refinement_level = ? WHERE id = ?")
            .bind(weapon.owned)
            .bind(weapon.level)
            .bind(weapon.refinement_level)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(weapon)
    }

    pub async fn snapshot(&self) -> Result<CatalogueSnapshot, CatalogueError> {
        Ok(CatalogueSnapshot::new(self.list_characters().await?, self.list_weapons().await?))
    }
}
