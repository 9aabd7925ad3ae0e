//! The public legal notice page and the footer that links to it.

use {
    std::convert::Infallible,
    rocket::{
        outcome::Outcome,
        request::{
            self,
            FromRequest,
        },
    },
    crate::{
        catalog::ContentParams,
        contacts,
        gravatar,
        order,
        prefs,
        prelude::*,
    },
};

/// External services the site embeds, listed in the privacy chapter.
const THIRD_PARTY_SERVICES: &[(&str, &str)] = &[
    ("Google charts", "https://developers.google.com/"),
];

const GRAVATAR_SIZE: u16 = 40;

fn plural<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

/// `Legal Notice`, extended with the privacy policy when the data protection chapter is enabled.
pub(crate) fn title(chapters: &[Chapter]) -> &'static str {
    if order::is_chapter_enabled(chapters, "DataProtection") { "Legal Notice and Privacy Policy" } else { "Legal Notice" }
}

/// The footer shown on pages belonging to `tree`. Pages outside a tree get no footer.
pub(crate) fn footer(prefs: &impl PreferenceStore, chapters: &[Chapter], tree: Option<&Tree>, current_year: i32) -> Option<RawHtml<String>> {
    let tree = tree?;
    let settings = Settings::new(prefs);
    Some(html! {
        footer(class = "legal-notice") {
            @if let Some(copyright) = settings.copyright_notice(current_year) {
                p(class = "copyright") : copyright;
            }
            p {
                a(href = uri!(get(Some(&*tree.name)))) : title(chapters);
            }
        }
    })
}

fn responsible<P: PreferenceStore>(settings: &Settings<'_, P>, site: &str) -> RawHtml<String> {
    let organization = settings.organization();
    let additional_address = settings.additional_address();
    let phone = settings.phone();
    let fax = settings.fax();
    let vat_number = settings.vat_number();
    let email = settings.email_link(site);
    html! {
        div(class = "responsible") {
            @if settings.show_gravatar() && !settings.email().trim().is_empty() {
                : gravatar::image(settings.email(), &settings.responsible_name(), GRAVATAR_SIZE);
            }
            p {
                @if !organization.is_empty() {
                    : organization;
                    br;
                    : "Represented by:";
                    br;
                }
                : settings.responsible_name();
                br;
                @if !additional_address.is_empty() {
                    : additional_address;
                    br;
                }
                : settings.street();
                br;
                : settings.city();
            }
            @if !phone.is_empty() || !fax.is_empty() || email.is_some() {
                p {
                    @if !phone.is_empty() {
                        : "Phone: ";
                        : phone;
                        br;
                    }
                    @if !fax.is_empty() {
                        : "Fax: ";
                        : fax;
                        br;
                    }
                    @if let Some(email) = email {
                        : "eMail: ";
                        : email;
                    }
                }
            }
            @if !vat_number.is_empty() {
                p {
                    : settings.vat_number_label();
                    : " ";
                    : vat_number;
                }
            }
        }
    }
}

fn contact_lists<P: PreferenceStore>(settings: &Settings<'_, P>, directory: &impl UserDirectory, tree: Option<&Tree>) -> RawHtml<String> {
    let tree_contacts = if settings.show_tree_contacts() { contacts::tree_contacts(directory, tree) } else { Vec::default() };
    let administrators = if settings.show_administrators() { contacts::administrator_contacts(directory) } else { Vec::default() };
    html! {
        @if !tree_contacts.is_empty() {
            h2 : plural(tree_contacts.len(), "Additional contact", "Additional contacts");
            ul {
                @for contact in &tree_contacts {
                    li : contact;
                }
            }
        }
        @if !administrators.is_empty() {
            h2 : plural(administrators.len(), "Website administrator", "Website administrators");
            p : plural(administrators.len(),
                "The webtrees administrator is responsible to manage users and to set the preferences for this website.",
                "The webtrees administrators are responsible to manage users and to set the preferences for this website.",
            );
            ul {
                @for admin in &administrators {
                    li {
                        @if settings.show_gravatar() && !admin.email.is_empty() {
                            : gravatar::image(admin.email, admin.name, GRAVATAR_SIZE);
                        }
                        : admin.contact.clone();
                    }
                }
            }
        }
    }
}

/// Third-party services and hosting details, appended to the privacy chapter.
fn privacy_details<P: PreferenceStore>(settings: &Settings<'_, P>, hosting_domain: &str) -> RawHtml<String> {
    let company_name = settings.hosting_company_name();
    let company_url = settings.hosting_company_url();
    let privacy_notice = settings.hosting_privacy_notice();
    let start_date = settings.hosting_start_date();
    let end_date = settings.hosting_end_date();
    html! {
        p : "This website uses the following services of third parties:";
        ul {
            @for (name, url) in THIRD_PARTY_SERVICES {
                li {
                    a(href = *url) : *name;
                }
            }
        }
        @if settings.has_hosting_details() {
            p {
                : "The website ";
                : hosting_domain;
                : " is hosted by ";
                @if company_url.is_empty() {
                    : company_name;
                } else {
                    a(href = company_url) {
                        @if company_name.is_empty() {
                            : company_url;
                        } else {
                            : company_name;
                        }
                    }
                }
                @let country = settings.hosting_country();
                @if !country.is_empty() {
                    : " in ";
                    : country;
                }
                : ".";
                @if !start_date.is_empty() {
                    : " A contract for order processing according to Art. 28 GDPR is in effect from ";
                    : start_date;
                    @if !end_date.is_empty() {
                        : " until ";
                        : end_date;
                    }
                    : ".";
                }
            }
            @if !privacy_notice.is_empty() {
                p {
                    : "The hosting company's privacy notice: ";
                    a(href = privacy_notice) : privacy_notice;
                }
            }
        }
    }
}

/// The body of the legal notice page.
pub(crate) fn notice<P: PreferenceStore>(settings: &Settings<'_, P>, chapters: &[Chapter], directory: &impl UserDirectory, tree: Option<&Tree>, hosting_domain: &str) -> RawHtml<String> {
    let voice = Voice::for_administrators(directory.administrators().len());
    html! {
        h1 : title(chapters);
        h2 : "Responsible person";
        : responsible(settings, hosting_domain);
        : contact_lists(settings, directory, tree);
        @for chapter in order::visible(chapters) {
            @if let Level::Section = chapter.level() {
                h2(id = chapter.key()) : chapter.heading();
            } else {
                h3(id = chapter.key()) : chapter.heading();
            }
            @for paragraph in chapter.content().paragraphs(voice) {
                p : paragraph;
            }
            @if chapter.key() == "Privacy" {
                : privacy_details(settings, hosting_domain);
            }
        }
    }
}

/// The `Host` header of the request, if any.
pub(crate) struct RequestHost(Option<String>);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for RequestHost {
    type Error = Infallible;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        Outcome::Success(Self(req.host().map(|host| host.domain().to_string())))
    }
}

#[rocket::get("/legal-notice?<tree>")]
pub(crate) async fn get(pool: &State<PgPool>, config: &State<Config>, host: RequestHost, me: Option<User>, tree: Option<&str>) -> Result<RawHtml<String>, StatusOrError<PageError>> {
    let mut transaction = pool.begin().await?;
    let prefs = Preferences::load(&mut transaction, prefs::MODULE).await?;
    let tree = if let Some(name) = tree {
        Some(Tree::from_name(&mut transaction, name).await?.ok_or(StatusOrError::Status(Status::NotFound))?)
    } else {
        None
    };
    let directory = Directory::load(&mut transaction, tree.as_ref()).await?;
    transaction.commit().await?;
    let hosting_domain = config.hosting_domain(host.0.as_deref());
    let settings = Settings::new(&prefs);
    let chapters = order::merge(&Catalog::CURRENT, &prefs, ContentParams {
        hosting_domain: &hosting_domain,
        hosting_country: settings.hosting_country(),
    })?;
    let footer = footer(&prefs, &chapters, tree.as_ref(), Utc::now().year());
    Ok(page(me.as_ref(), footer, title(&chapters), notice(&settings, &chapters, &directory, tree.as_ref(), &hosting_domain)))
}

#[cfg(test)]
mod tests {
    use {
        crate::directory::test_user,
        super::*,
    };

    fn chapters(prefs: &Preferences) -> Vec<Chapter> {
        order::merge(&Catalog::CURRENT, prefs, ContentParams { hosting_domain: "ahnen.example.org", hosting_country: "Germany" }).expect("current catalog")
    }

    fn tree() -> Tree {
        Tree {
            name: format!("family"),
            contact_user: Some(UserId(2)),
            webmaster_user: Some(UserId(1)),
        }
    }

    fn render(prefs: &Preferences, directory: &Directory) -> String {
        notice(&Settings::new(prefs), &chapters(prefs), directory, Some(&tree()), "ahnen.example.org").0
    }

    #[test]
    fn title_mentions_privacy_policy_only_with_data_protection() {
        assert_eq!(title(&chapters(&Preferences::default())), "Legal Notice and Privacy Policy");
        assert_eq!(title(&chapters(&Preferences::from_iter([("status-DataProtection", "0")]))), "Legal Notice");
    }

    #[test]
    fn footer_needs_a_tree() {
        let prefs = Preferences::from_iter([("showCopyRight", "1"), ("copyRightStartYear", "2015"), ("copyRightName", "Jane Doe")]);
        let chapters = chapters(&prefs);
        assert!(footer(&prefs, &chapters, None, 2026).is_none());
        let footer = footer(&prefs, &chapters, Some(&tree()), 2026).expect("tree context").0;
        assert!(footer.contains("© 2015–2026 Jane Doe"), "{footer}");
        assert!(footer.contains("/legal-notice?tree=family"), "{footer}");
        assert!(footer.contains("Legal Notice and Privacy Policy"));
    }

    #[test]
    fn single_administrator_uses_first_person() {
        let prefs = Preferences::default();
        let html = render(&prefs, &Directory::from_iter([test_user(1, "Alice", true), test_user(2, "Bob", false)]));
        assert!(html.contains("The contents of my pages"));
        let html = render(&prefs, &Directory::from_iter([test_user(1, "Alice", true), test_user(2, "Bob", true)]));
        assert!(html.contains("The contents of our pages"));
    }

    #[test]
    fn disabled_section_hides_its_subsections() {
        let prefs = Preferences::from_iter([("status-DataProtection", "0")]);
        let html = render(&prefs, &Directory::default());
        assert!(!html.contains("Right of appeal"));
        assert!(!html.contains("Google charts"));
        assert!(html.contains("Liability for links"));
    }

    #[test]
    fn privacy_chapter_lists_services_and_hosting() {
        let prefs = Preferences::from_iter([("hostingCompanyName", "Hoster AG"), ("hostingCompanyUrl", "https://hoster.example"), ("hostingCountry", "Germany")]);
        let html = render(&prefs, &Directory::default());
        assert!(html.contains("Google charts"));
        assert!(html.contains("The website ahnen.example.org is hosted by "), "{html}");
        assert!(html.contains("Hoster AG"));
        assert!(html.contains(" in Germany"));
    }

    #[test]
    fn contact_lists_follow_their_flags() {
        let directory = Directory::from_iter([test_user(1, "Alice", true), test_user(2, "Bob", false)]);
        let html = render(&Preferences::default(), &directory);
        assert!(!html.contains("Additional contact"));
        assert!(!html.contains("Website administrator"));
        let html = render(&Preferences::from_iter([("showTreeContacts", "1"), ("showAdministrators", "1")]), &directory);
        assert!(html.contains("Additional contacts"));
        assert!(html.contains("For help with genealogy questions contact "));
        assert!(html.contains("Website administrator"));
        assert!(!html.contains("Website administrators"));
    }

    #[test]
    fn gravatar_needs_flag_and_address() {
        assert!(!render(&Preferences::from_iter([("showGravatar", "1")]), &Directory::default()).contains("gravatar.com"));
        assert!(!render(&Preferences::from_iter([("email", "jane@example.org")]), &Directory::default()).contains("gravatar.com"));
        assert!(render(&Preferences::from_iter([("showGravatar", "1"), ("email", "jane@example.org")]), &Directory::default()).contains("gravatar.com/avatar/"));
    }

    #[test]
    fn administrators_get_named_gravatars() {
        let directory = Directory::from_iter([test_user(1, "Alice", true), test_user(2, "Bob", true)]);
        let html = render(&Preferences::from_iter([("showAdministrators", "1"), ("showGravatar", "1")]), &directory);
        assert!(html.contains("alt=\"Alice\""), "{html}");
        assert!(html.contains("alt=\"Bob\""));
        let html = render(&Preferences::from_iter([("showAdministrators", "1")]), &directory);
        assert!(!html.contains("gravatar.com"));
    }
}
