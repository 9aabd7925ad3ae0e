use crate::prelude::*;

/// One line of the "additional contacts" list of a family tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TreeContact<'a> {
    /// The same user answers both genealogy and technical questions.
    Everything(&'a DirectoryUser),
    Genealogy(&'a DirectoryUser),
    Technical(&'a DirectoryUser),
}

impl ToHtml for TreeContact<'_> {
    fn to_html(&self) -> RawHtml<String> {
        match self {
            Self::Everything(user) => html! {
                : "For technical support or genealogy questions contact ";
                : *user;
            },
            Self::Genealogy(user) => html! {
                : "For help with genealogy questions contact ";
                : *user;
            },
            Self::Technical(user) => html! {
                : "For technical support and information contact ";
                : *user;
            },
        }
    }
}

/// The genealogy and technical contacts of `tree`. Without a tree, or with no roles set, the list is empty.
pub(crate) fn tree_contacts<'a>(directory: &'a impl UserDirectory, tree: Option<&Tree>) -> Vec<TreeContact<'a>> {
    let Some(tree) = tree else { return Vec::default() };
    let contact = tree.contact_user.and_then(|id| directory.find(id));
    let webmaster = tree.webmaster_user.and_then(|id| directory.find(id));
    match (contact, webmaster) {
        (Some(contact), Some(webmaster)) if contact.id == webmaster.id => vec![TreeContact::Everything(contact)],
        (contact, webmaster) => contact.map(TreeContact::Genealogy).into_iter()
            .chain(webmaster.map(TreeContact::Technical))
            .collect(),
    }
}

pub(crate) struct AdministratorContact<'a> {
    pub(crate) name: &'a str,
    pub(crate) email: &'a str,
    pub(crate) contact: RawHtml<String>,
}

pub(crate) fn administrator_contacts(directory: &impl UserDirectory) -> Vec<AdministratorContact<'_>> {
    directory.administrators().into_iter().map(|admin| AdministratorContact {
        name: admin.display_name(),
        email: &admin.email,
        contact: admin.to_html(),
    }).collect()
}

#[cfg(test)]
mod tests {
    use {
        crate::directory::test_user,
        super::*,
    };

    fn tree(contact_user: Option<i64>, webmaster_user: Option<i64>) -> Tree {
        Tree {
            name: format!("family"),
            contact_user: contact_user.map(UserId),
            webmaster_user: webmaster_user.map(UserId),
        }
    }

    fn directory() -> Directory {
        Directory::from_iter([test_user(1, "Alice", true), test_user(2, "Bob", false)])
    }

    #[test]
    fn same_user_collapses_to_one_entry() {
        let directory = directory();
        let contacts = tree_contacts(&directory, Some(&tree(Some(1), Some(1))));
        assert_eq!(contacts, [TreeContact::Everything(&test_user(1, "Alice", true))]);
    }

    #[test]
    fn distinct_users_get_separate_entries() {
        let directory = directory();
        let contacts = tree_contacts(&directory, Some(&tree(Some(2), Some(1))));
        assert_eq!(contacts.len(), 2);
        assert!(matches!(contacts[0], TreeContact::Genealogy(user) if user.id == UserId(2)));
        assert!(matches!(contacts[1], TreeContact::Technical(user) if user.id == UserId(1)));
        assert!(contacts[0].to_html().0.starts_with("For help with genealogy questions contact "));
    }

    #[test]
    fn unset_roles_are_omitted() {
        let directory = directory();
        assert!(matches!(tree_contacts(&directory, Some(&tree(None, Some(2))))[..], [TreeContact::Technical(_)]));
        assert!(matches!(tree_contacts(&directory, Some(&tree(Some(1), None)))[..], [TreeContact::Genealogy(_)]));
        assert!(tree_contacts(&directory, Some(&tree(None, None))).is_empty());
        assert!(tree_contacts(&directory, Some(&tree(Some(9), None))).is_empty(), "deleted user");
        assert!(tree_contacts(&directory, None).is_empty());
    }

    #[test]
    fn one_entry_per_administrator() {
        let directory = Directory::from_iter([test_user(1, "Alice", true), test_user(2, "Bob", false), test_user(5, "Eve", true)]);
        let admins = administrator_contacts(&directory);
        assert_eq!(admins.iter().map(|admin| admin.name).collect_vec(), ["Alice", "Eve"]);
        assert_eq!(admins[1].email, "eve@example.org");
        assert!(admins[1].contact.0.contains("mailto:eve@example.org"));
    }
}
