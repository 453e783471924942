//! SQLite schema definitions and SQL query constants.
//!
//! All SQL statements used by the SQLite repository live here as pure data.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS recipes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    ingredients TEXT NOT NULL,
    prep_time INTEGER NOT NULL,
    cook_time INTEGER NOT NULL,
    instructions TEXT NOT NULL
);
"#;

pub const INSERT_RECIPE: &str = r#"
INSERT INTO recipes (name, ingredients, prep_time, cook_time, instructions)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_RECIPE_BY_ID: &str = r#"
SELECT id, name, ingredients, prep_time, cook_time, instructions
FROM recipes
WHERE id = ?1
"#;

pub const SELECT_ALL_RECIPES: &str = r#"
SELECT id, name, ingredients, prep_time, cook_time, instructions
FROM recipes
ORDER BY id ASC
"#;

pub const UPDATE_RECIPE: &str = r#"
UPDATE recipes
SET name = ?2, ingredients = ?3, prep_time = ?4, cook_time = ?5, instructions = ?6
WHERE id = ?1
"#;

pub const DELETE_RECIPE: &str = r#"
DELETE FROM recipes
WHERE id = ?1
"#;
