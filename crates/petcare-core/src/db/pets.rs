//! Pet database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{classify_write_error, Database, DbResult};
use crate::models::Pet;

impl Database {
    /// Insert a new pet.
    pub fn insert_pet(&self, pet: &Pet) -> DbResult<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO pets (id, owner_id, name, species, breed, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    pet.id,
                    pet.owner_id,
                    pet.name,
                    pet.species,
                    pet.breed,
                    pet.created_at,
                ],
            )
            .map_err(|e| classify_write_error(e, None))?;
        Ok(())
    }

    /// Get a pet by ID.
    pub fn get_pet(&self, id: &str) -> DbResult<Option<Pet>> {
        self.conn
            .query_row(
                r#"
                SELECT id, owner_id, name, species, breed, created_at
                FROM pets
                WHERE id = ?
                "#,
                [id],
                pet_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all pets belonging to an owner.
    pub fn list_pets_for_owner(&self, owner_id: &str) -> DbResult<Vec<Pet>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, owner_id, name, species, breed, created_at
            FROM pets
            WHERE owner_id = ?
            ORDER BY name
            "#,
        )?;

        let rows = stmt.query_map([owner_id], pet_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn pet_from_row(row: &Row<'_>) -> rusqlite::Result<Pet> {
    Ok(Pet {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        species: row.get(3)?,
        breed: row.get(4)?,
        created_at: row.get(5)?,
    })
}
