// Users resource endpoints
//
// Four operations cover the whole backend contract: fetch one user by
// id (the session token), list every user, create a user, and replace a
// user's board collection.

use tracing::debug;

use crate::client::UsersClient;
use crate::error::Error;
use crate::models::{BoardRecord, BoardsPatch, NewUserRecord, UserRecord};

impl UsersClient {
    /// Fetch a single user, boards included.
    ///
    /// `GET /users/{id}`
    pub async fn get_user(&self, id: &str) -> Result<UserRecord, Error> {
        let url = self.endpoint(&["users", id])?;
        self.get(url).await
    }

    /// List every user known to the backend.
    ///
    /// `GET /users`
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, Error> {
        let url = self.endpoint(&["users"])?;
        debug!("listing users");
        self.get(url).await
    }

    /// Create a user and return the stored document (with its new id).
    ///
    /// `POST /users`
    pub async fn create_user(&self, user: &NewUserRecord) -> Result<UserRecord, Error> {
        let url = self.endpoint(&["users"])?;
        debug!(username = %user.username, "creating user");
        self.post(url, user).await
    }

    /// Replace the user's whole board collection.
    ///
    /// `PATCH /users/{id}` with `{ "boards": [...] }`
    pub async fn patch_boards(
        &self,
        id: &str,
        boards: Vec<BoardRecord>,
    ) -> Result<UserRecord, Error> {
        let url = self.endpoint(&["users", id])?;
        debug!(user = id, boards = boards.len(), "persisting boards");
        self.patch(url, &BoardsPatch { boards }).await
    }
}
