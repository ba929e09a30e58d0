use crate::db::DbPool;
use crate::models::User;
use crate::schema::users;
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a new user in the database
///
/// The caller is responsible for hashing the password and for checking that
/// the email is not already registered (the unique index is the backstop).
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `email` - The user's email address, already normalized to lowercase
/// * `password_hash` - The Argon2 hash of the user's password
///
/// ### Returns
///
/// A Result containing the newly created User if successful
#[instrument(skip(pool, password_hash), fields(email = %email))]
pub fn create_user(pool: &DbPool, email: String, password_hash: String) -> Result<User> {
    debug!("Creating new user");

    let conn = &mut pool.get()?;

    let new_user = User::new(email, password_hash);
    diesel::insert_into(users::table)
        .values(new_user.clone())
        .execute(conn)?;

    info!("Successfully created user with id: {}", new_user.get_id());

    Ok(new_user)
}

/// Retrieves a user by ID
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn get_user(pool: &DbPool, user_id: &str) -> Result<Option<User>> {
    debug!("Retrieving user by id");

    let conn = &mut pool.get()?;

    let result = users::table.find(user_id).first::<User>(conn).optional()?;

    Ok(result)
}

/// Retrieves a user by email address
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `email` - The email address to look up, already normalized to lowercase
#[instrument(skip(pool), fields(email = %email))]
pub fn get_user_by_email(pool: &DbPool, email: &str) -> Result<Option<User>> {
    debug!("Retrieving user by email");

    let conn = &mut pool.get()?;

    let result = users::table
        .filter(users::email.eq(email))
        .first::<User>(conn)
        .optional()?;

    Ok(result)
}

/// Replaces a user's password hash
#[instrument(skip(pool, password_hash), fields(user_id = %user_id))]
pub fn update_user_password(pool: &DbPool, user_id: &str, password_hash: String) -> Result<()> {
    debug!("Updating user password hash");

    let conn = &mut pool.get()?;

    diesel::update(users::table.find(user_id))
        .set(users::password_hash.eq(password_hash))
        .execute(conn)?;

    info!("Password updated for user {}", user_id);

    Ok(())
}
