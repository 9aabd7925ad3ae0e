//! Read access to the host's user accounts and family trees.

use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct UserId(pub(crate) i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// How visitors may contact a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContactMethod {
    Mailto,
    NoContact,
}

impl ContactMethod {
    fn parse(method: &str) -> Self {
        match method {
            "none" => Self::NoContact,
            _ => Self::Mailto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DirectoryUser {
    pub(crate) id: UserId,
    pub(crate) user_name: String,
    pub(crate) real_name: String,
    pub(crate) email: String,
    pub(crate) is_admin: bool,
    pub(crate) contact_method: ContactMethod,
}

impl DirectoryUser {
    pub(crate) fn display_name(&self) -> &str {
        if self.real_name.is_empty() { &self.user_name } else { &self.real_name }
    }
}

impl ToHtml for DirectoryUser {
    /// The user's name, linked to their e-mail address unless they opted out of being contacted.
    fn to_html(&self) -> RawHtml<String> {
        match self.contact_method {
            ContactMethod::Mailto if !self.email.is_empty() => html! {
                a(href = format!("mailto:{}", self.email)) : self.display_name();
            },
            _ => html! {
                bdi : self.display_name();
            },
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    user_name: String,
    real_name: String,
    email: String,
    is_admin: bool,
    contact_method: String,
}

impl From<UserRow> for DirectoryUser {
    fn from(UserRow { id, user_name, real_name, email, is_admin, contact_method }: UserRow) -> Self {
        Self {
            id: UserId(id),
            contact_method: ContactMethod::parse(&contact_method),
            user_name, real_name, email, is_admin,
        }
    }
}

impl DirectoryUser {
    pub(crate) async fn from_id(transaction: &mut Transaction<'_, Postgres>, id: UserId) -> sqlx::Result<Option<Self>> {
        Ok(sqlx::query_as::<_, UserRow>("SELECT id, user_name, real_name, email, is_admin, contact_method FROM users WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&mut **transaction).await?
            .map(Self::from))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tree {
    pub(crate) name: String,
    /// The user who answers genealogy questions.
    pub(crate) contact_user: Option<UserId>,
    /// The user who answers technical questions.
    pub(crate) webmaster_user: Option<UserId>,
}

impl Tree {
    pub(crate) async fn from_name(transaction: &mut Transaction<'_, Postgres>, name: &str) -> sqlx::Result<Option<Self>> {
        Ok(sqlx::query_as::<_, (String, Option<i64>, Option<i64>)>("SELECT name, contact_user, webmaster_user FROM trees WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut **transaction).await?
            .map(|(name, contact_user, webmaster_user)| Self {
                contact_user: contact_user.map(UserId),
                webmaster_user: webmaster_user.map(UserId),
                name,
            }))
    }
}

pub(crate) trait UserDirectory {
    fn find(&self, id: UserId) -> Option<&DirectoryUser>;
    /// All site administrators, ordered by id.
    fn administrators(&self) -> Vec<&DirectoryUser>;
}

/// The users a legal notice page refers to: all administrators and the contacts of the current tree.
#[derive(Debug, Default)]
pub(crate) struct Directory {
    users: BTreeMap<UserId, DirectoryUser>,
}

impl Directory {
    pub(crate) async fn load(transaction: &mut Transaction<'_, Postgres>, tree: Option<&Tree>) -> sqlx::Result<Self> {
        let contacts = tree.into_iter().flat_map(|tree| [tree.contact_user, tree.webmaster_user]).flatten().map(|UserId(id)| id).collect_vec();
        let users = sqlx::query_as::<_, UserRow>("SELECT id, user_name, real_name, email, is_admin, contact_method FROM users WHERE is_admin OR id = ANY($1)")
            .bind(contacts)
            .fetch_all(&mut **transaction).await?;
        Ok(users.into_iter().map(DirectoryUser::from).collect())
    }
}

impl FromIterator<DirectoryUser> for Directory {
    fn from_iter<I: IntoIterator<Item = DirectoryUser>>(iter: I) -> Self {
        Self { users: iter.into_iter().map(|user| (user.id, user)).collect() }
    }
}

impl UserDirectory for Directory {
    fn find(&self, id: UserId) -> Option<&DirectoryUser> {
        self.users.get(&id)
    }

    fn administrators(&self) -> Vec<&DirectoryUser> {
        self.users.values().filter(|user| user.is_admin).collect()
    }
}

#[cfg(test)]
pub(crate) fn test_user(id: i64, real_name: &str, is_admin: bool) -> DirectoryUser {
    DirectoryUser {
        id: UserId(id),
        user_name: real_name.to_lowercase().replace(' ', "."),
        email: format!("{}@example.org", real_name.to_lowercase().replace(' ', ".")),
        real_name: real_name.to_owned(),
        contact_method: ContactMethod::Mailto,
        is_admin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn administrators_are_filtered_and_ordered() {
        let directory = Directory::from_iter([test_user(3, "Carol", true), test_user(1, "Alice", true), test_user(2, "Bob", false)]);
        assert_eq!(directory.administrators().into_iter().map(|user| user.id).collect_vec(), [UserId(1), UserId(3)]);
        assert_eq!(directory.find(UserId(2)).map(|user| user.display_name()), Some("Bob"));
        assert!(directory.find(UserId(4)).is_none());
    }

    #[test]
    fn contact_link_respects_opt_out() {
        let mut user = test_user(1, "Jane Doe", true);
        assert!(user.to_html().0.contains("mailto:jane.doe@example.org"));
        user.contact_method = ContactMethod::parse("none");
        let html = user.to_html().0;
        assert!(!html.contains("mailto:"));
        assert!(html.contains("Jane Doe"));
    }
}
