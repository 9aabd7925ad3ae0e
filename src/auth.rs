//! Request guards for the signed-in user.
//!
//! Sessions belong to the host application, which stores the user id in the
//! private `user_id` cookie, encrypted with the shared secret key.

use {
    rocket::{
        outcome::Outcome,
        request::{
            self,
            FromRequest,
        },
    },
    crate::prelude::*,
};

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error(transparent)] Sql(#[from] sqlx::Error),
    #[error("database pool not managed by Rocket")]
    MissingPool,
    #[error("this page is for site administrators only")]
    NotAdmin,
}

#[derive(Debug)]
pub(crate) struct User(pub(crate) DirectoryUser);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for User {
    type Error = Error;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let Some(id) = req.cookies().get_private("user_id").and_then(|cookie| cookie.value().parse().ok()) else {
            return Outcome::Forward(Status::Unauthorized)
        };
        let Some(pool) = req.guard::<&State<PgPool>>().await.succeeded() else {
            return Outcome::Error((Status::InternalServerError, Error::MissingPool))
        };
        let user = match pool.begin().await {
            Ok(mut transaction) => DirectoryUser::from_id(&mut transaction, UserId(id)).await,
            Err(e) => Err(e),
        };
        match user {
            Ok(Some(user)) => Outcome::Success(Self(user)),
            // account deleted since the cookie was issued
            Ok(None) => Outcome::Forward(Status::Unauthorized),
            Err(e) => Outcome::Error((Status::InternalServerError, Error::Sql(e))),
        }
    }
}

/// A signed-in site administrator.
#[derive(Debug)]
pub(crate) struct Admin(pub(crate) User);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Admin {
    type Error = Error;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match req.guard::<User>().await {
            Outcome::Success(user) if user.0.is_admin => Outcome::Success(Self(user)),
            Outcome::Success(_) | Outcome::Forward(_) => Outcome::Error((Status::Forbidden, Error::NotAdmin)),
            Outcome::Error(e) => Outcome::Error(e),
        }
    }
}
