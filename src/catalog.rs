use crate::prelude::*;

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("unknown chapter: {0}")]
    UnknownChapter(String),
}

/// Structural data for one chapter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChapterMetadata {
    pub(crate) key: &'static str,
    pub(crate) id: u16,
    pub(crate) level: Level,
    pub(crate) link: u16,
    pub(crate) heading: &'static str,
}

/// Site data interpolated into default chapter text.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ContentParams<'a> {
    pub(crate) hosting_domain: &'a str,
    pub(crate) hosting_country: &'a str,
}

/// All chapters a release knows about, in their default order.
///
/// Entries may be appended in later releases but never removed or renamed,
/// since operators' stored orders refer to them by key.
#[derive(Clone, Copy)]
pub(crate) struct Catalog {
    entries: &'static [ChapterMetadata],
    content: fn(&str, ContentParams<'_>) -> ChapterContent,
}

impl Catalog {
    pub(crate) const CURRENT: Self = Self::new(CHAPTERS, default_content);

    pub(crate) const fn new(entries: &'static [ChapterMetadata], content: fn(&str, ContentParams<'_>) -> ChapterContent) -> Self {
        Self { entries, content }
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &'static str> + use<> {
        self.entries.iter().map(|entry| entry.key)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the catalog's own copy of `key`, if known.
    pub(crate) fn key(&self, key: &str) -> Option<&'static str> {
        self.entries.iter().find(|entry| entry.key == key).map(|entry| entry.key)
    }

    pub(crate) fn metadata(&self, key: &str) -> Result<&'static ChapterMetadata, Error> {
        self.entries.iter().find(|entry| entry.key == key).ok_or_else(|| Error::UnknownChapter(key.to_owned()))
    }

    pub(crate) fn default_content(&self, key: &str, params: ContentParams<'_>) -> Result<ChapterContent, Error> {
        self.metadata(key)?;
        Ok((self.content)(key, params))
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

// keys are stored in operator preferences; append only
const CHAPTERS: &[ChapterMetadata] = &[
    ChapterMetadata { key: "DataProtection", id: 1, level: Level::Section, link: 0, heading: "Data protection" },
    ChapterMetadata { key: "Purpose", id: 2, level: Level::Subsection, link: 1, heading: "Purpose" },
    ChapterMetadata { key: "Privacy", id: 3, level: Level::Subsection, link: 1, heading: "Privacy" },
    ChapterMetadata { key: "PersonalData", id: 4, level: Level::Subsection, link: 1, heading: "Processing of personal data" },
    ChapterMetadata { key: "GDPR", id: 5, level: Level::Subsection, link: 1, heading: "GDPR in connection with online genealogies" },
    ChapterMetadata { key: "ProvidingInformation", id: 6, level: Level::Subsection, link: 1, heading: "Right of providing information" },
    ChapterMetadata { key: "CorrectionDeletion", id: 7, level: Level::Subsection, link: 1, heading: "Right to correction or deletion of personal data" },
    ChapterMetadata { key: "Appeal", id: 8, level: Level::Subsection, link: 1, heading: "Right of appeal" },
    ChapterMetadata { key: "LegalRegulations", id: 9, level: Level::Section, link: 0, heading: "Legal regulations" },
    ChapterMetadata { key: "LiabilityContent", id: 10, level: Level::Subsection, link: 9, heading: "Liability for the content of these websites" },
    ChapterMetadata { key: "LiabilityLinks", id: 11, level: Level::Subsection, link: 9, heading: "Liability for links" },
    ChapterMetadata { key: "Copyright", id: 12, level: Level::Subsection, link: 9, heading: "Copyright and distribution of genealogical data" },
    ChapterMetadata { key: "UseDataLegalNotice", id: 13, level: Level::Subsection, link: 9, heading: "Use of the address data in the Legal Notice" },
    ChapterMetadata { key: "MitigateDamages", id: 14, level: Level::Subsection, link: 9, heading: "Duty to mitigate damages" },
    ChapterMetadata { key: "OpenSourceLicense", id: 15, level: Level::Subsection, link: 9, heading: "Open-source and License" },
    ChapterMetadata { key: "SeverabilityClause", id: 16, level: Level::Subsection, link: 9, heading: "Severability Clause" },
];

fn flat(paragraphs: &[&str]) -> ChapterContent {
    ChapterContent::Paragraphs(paragraphs.iter().map(|&paragraph| paragraph.to_owned()).collect())
}

fn styled(singular: Vec<String>, plural: Vec<String>) -> ChapterContent {
    ChapterContent::Styled { singular, plural }
}

fn default_content(key: &str, ContentParams { hosting_domain, hosting_country }: ContentParams<'_>) -> ChapterContent {
    match key {
        "DataProtection" | "LegalRegulations" => ChapterContent::empty(),
        "Purpose" => flat(&[
            "This website presents genealogical research: family trees, sources and the people and events connected to them. Personal data is processed only as far as necessary to provide these pages and the functions of a genealogy website.",
        ]),
        "Privacy" => flat(&[
            "Living people are protected by the privacy settings of this website. Their data is shown only to registered users with the appropriate access rights. Visitors without an account see deceased people only.",
        ]),
        "PersonalData" => flat(&[
            "“Processing” is defined by Art. 4(1) GDPR and includes collection, storage, use, disclosure and deletion. When you register, your user name, real name and e-mail address are stored to manage your account. The web server records technical access data (IP address, time, requested page) in log files for operating and securing this website.",
        ]),
        "GDPR" => flat(&[
            "The GDPR does not apply to data about deceased people. Data about living people is processed on the basis of legitimate interest in family history research (Art. 6(1)(f) GDPR) or with the consent of the people concerned.",
        ]),
        "ProvidingInformation" => flat(&[
            "You have the right to obtain information about the personal data stored about you at any time (Art. 15 GDPR).",
        ]),
        "CorrectionDeletion" => flat(&[
            "You have the right to have incorrect personal data corrected (Art. 16 GDPR) and to have your personal data deleted or its processing restricted (Arts. 17–18 GDPR). Personal data is deleted once the purpose of processing ceases, unless statutory retention requires otherwise.",
        ]),
        "Appeal" => flat(&[
            "You have the right to lodge a complaint with a data protection supervisory authority (Art. 77 GDPR).",
        ]),
        "LiabilityContent" => styled(
            vec![
                format!("The contents of my pages were created with great care. However, I cannot guarantee that the content is correct, complete or up-to-date. I am responsible for my own content on these pages according to general laws; However, I am not obliged to monitor transmitted or stored third-party information or to investigate circumstances that indicate illegal activity. An obligation to remove or block the use of information according to general laws remains unaffected. However, liability in this regard is only possible from the point in time at which knowledge of a specific infringement of the law is known. As soon as I become aware of any legal violations, I will remove this content immediately."),
                format!("If you, as a user of this site, are entitled to create content yourself or upload files, you are obliged to comply with all legal requirements and to protect personal data by using the privacy mechanisms of this website. If in doubt, please feel free to contact me."),
            ],
            vec![
                format!("The contents of our pages were created with great care. However, we cannot guarantee that the content is correct, complete or up-to-date. We are responsible for our own content on these pages according to general laws; however, we are not obliged to monitor transmitted or stored third-party information or to investigate circumstances that indicate illegal activity. An obligation to remove or block the use of information according to general laws remains unaffected. However, liability in this regard is only possible from the point in time at which knowledge of a specific infringement of the law is known. As soon as we become aware of any legal violations, we will remove this content immediately."),
                format!("If you, as a user of this site, are entitled to create content yourself or upload files, you are obliged to comply with all legal requirements and to protect personal data by using the privacy mechanisms of this website. If in doubt, please feel free to contact us."),
            ],
        ),
        "LiabilityLinks" => styled(
            vec![format!("This web application contains links to external websites over which I have no control. Therefore I cannot assume any liability for this external content. The respective provider or operator of the pages is always responsible for the content of the linked pages. The linked pages were checked for possible legal violations at the time of linking. Illegal content was not recognizable at the time of linking. However, a permanent control of the content of the linked pages is not reasonable without concrete evidence of an infringement. As soon as I become aware of legal violations, I will remove such links immediately.")],
            vec![format!("This web application contains links to external websites over which we have no control. Therefore we cannot assume any liability for this external content. The respective provider or operator of the pages is always responsible for the content of the linked pages. The linked pages were checked for possible legal violations at the time of linking. Illegal content was not recognizable at the time of linking. However, a permanent control of the content of the linked pages is not reasonable without concrete evidence of an infringement. As soon as we become aware of legal violations, we will remove such links immediately.")],
        ),
        "Copyright" => {
            let jurisdiction = if hosting_country.is_empty() { String::default() } else { format!(" in {hosting_country}") };
            styled(
                vec![
                    format!("I always endeavor to observe the copyrights of others or to use self-created and license-free works. Third-party contributions to this website are marked as such by naming a source if they cannot be used freely. Should you nevertheless become aware of a copyright infringement, please inform me accordingly. As soon as I become aware of legal violations, I will remove such content immediately."),
                    format!("The content and works created by me and the registered users on this website are subject to copyright{jurisdiction}. If you contribute content as a registered user of this website, you transfer all rights to it to me. The distribution and any kind of exploitation of the content of this website outside the limits of copyright require my written consent. Commercial use of the information provided here is generally prohibited."),
                    format!("Copying or downloading genealogical data for private use is permitted. Anyone who wants to use parts of this data in their own family trees is obliged to name {hosting_domain} as the source. In particular, the protected images may only be accessible there for family members. The information on living people must not be copied to other websites where the privacy of these people cannot be guaranteed. A lot of time and effort was put into this database. I don't want others to simply copy this work. I expect you to follow these guidelines as well. This database remains my property and will not be sold, donated or rented in any way."),
                ],
                vec![
                    format!("We always endeavor to observe the copyrights of others or to use self-created and license-free works. Third-party contributions to this website are marked as such by naming a source if they cannot be used freely. Should you nevertheless become aware of a copyright infringement, please inform us accordingly. As soon as we become aware of legal violations, we will remove such content immediately."),
                    format!("The content and works created by us and by the registered users on this website are subject to copyright{jurisdiction}. If you contribute content as a registered user of this website, you transfer all rights to it to us. The distribution and any kind of exploitation of the content of this website outside the limits of copyright require our written consent. Commercial use of the information provided here is generally prohibited."),
                    format!("Copying or downloading genealogical data for private use is permitted. Anyone who wants to use parts of our data in their own family trees is obliged to name {hosting_domain} as the source. In particular, the protected images may only be accessible there for family members. The information on living people must not be copied to other websites where the privacy of these people cannot be guaranteed. A lot of time and effort was put into this database. We don't want others to simply copy our work. We expect you to follow these guidelines as well. This database remains our property and will not be sold, donated or rented in any way."),
                ],
            )
        }
        "UseDataLegalNotice" => styled(
            vec![format!("The use of the contact data published as part of the imprint obligation by third parties for the purpose of sending unsolicited advertising and information material is hereby expressly prohibited. I expressly reserve the right to take legal action in the event of unsolicited advertising being sent, such as spam e-mails.")],
            vec![format!("The use of the contact data published as part of the imprint obligation by third parties for the purpose of sending unsolicited advertising and information material is hereby expressly prohibited. We expressly reserve the right to take legal action in the event of unsolicited advertising being sent, such as spam e-mails.")],
        ),
        "MitigateDamages" => styled(
            vec![format!("Should you notice any irregularities on this website, please contact me beforehand to avoid unnecessary legal disputes and costs. I am sure that we will come to an amicable and informal solution. The cost note of a legal warning will therefore be rejected as unfounded in the sense of the obligation to mitigate the damage if I have not been contacted via my e-mail address beforehand and have been informed of this possible grievance.")],
            vec![format!("Should you notice any irregularities on our website, we ask you to contact us beforehand to avoid unnecessary legal disputes and costs. We are sure that we will come to an amicable and informal solution. The cost note of a legal warning will therefore be rejected as unfounded in the sense of the obligation to mitigate the damage if we have not been contacted beforehand via one of our e-mail addresses and have been informed of this possible grievance.")],
        ),
        "OpenSourceLicense" => flat(&[
            "This website uses the genealogy program webtrees, an open source software. The source code is publicly available on GitHub and can be changed by anyone. Usage is free. This program was developed by people from many countries and is provided under the terms of the GNU General Public License Version 3 or a later version. The developers and the entire webtrees community are volunteering their time and skills to the project.",
        ]),
        "SeverabilityClause" => flat(&[
            "If parts or individual formulations of this text do not, no longer or not completely correspond to the applicable legal situation, the remaining parts of the text remain unaffected in their content and validity.",
        ]),
        _ => ChapterContent::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique() {
        let keys = Catalog::CURRENT.keys().collect_vec();
        assert_eq!(keys.len(), 16);
        assert!(keys.iter().all_unique());
        assert!(Catalog::CURRENT.keys().eq(keys.iter().copied()), "key order must be stable across calls");
    }

    #[test]
    fn subsections_link_to_sections() {
        for entry in CHAPTERS {
            match entry.level {
                Level::Section => assert_eq!(entry.link, 0, "{}", entry.key),
                Level::Subsection => {
                    let parent = CHAPTERS.iter().find(|candidate| candidate.id == entry.link).unwrap_or_else(|| panic!("dangling link on {}", entry.key));
                    assert_eq!(parent.level, Level::Section, "{}", entry.key);
                }
            }
        }
    }

    #[test]
    fn ids_follow_default_order() {
        for (idx, entry) in CHAPTERS.iter().enumerate() {
            assert_eq!(usize::from(entry.id), idx + 1);
        }
    }

    #[test]
    fn unknown_key_is_not_found() {
        assert!(matches!(Catalog::CURRENT.metadata("Cookies"), Err(Error::UnknownChapter(key)) if key == "Cookies"));
        assert!(Catalog::CURRENT.default_content("Cookies", ContentParams::default()).is_err());
        assert_eq!(Catalog::CURRENT.key("GDPR"), Some("GDPR"));
    }

    #[test]
    fn copyright_mentions_hosting_data() {
        let params = ContentParams { hosting_domain: "ahnen.example.org", hosting_country: "Germany" };
        let content = Catalog::CURRENT.default_content("Copyright", params).expect("Copyright is in the catalog");
        let plural = content.paragraphs(Voice::Plural);
        assert!(plural[1].contains("subject to copyright in Germany."));
        assert!(plural[2].contains("name ahnen.example.org as the source"));
        let without_country = Catalog::CURRENT.default_content("Copyright", ContentParams { hosting_domain: "x", hosting_country: "" }).expect("Copyright is in the catalog");
        assert!(without_country.paragraphs(Voice::Singular)[1].contains("subject to copyright. "));
    }
}
