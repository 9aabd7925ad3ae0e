use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Text,
    /// A checkbox, stored as `"0"`/`"1"`.
    Flag,
    /// `M`, `F` or `U` (unspecified).
    Sex,
}

pub(crate) struct Field {
    pub(crate) name: &'static str,
    pub(crate) kind: FieldKind,
    pub(crate) label: &'static str,
    pub(crate) help: Option<&'static str>,
}

const fn text(name: &'static str, label: &'static str) -> Field {
    Field { name, kind: FieldKind::Text, label, help: None }
}

const fn flag(name: &'static str, label: &'static str) -> Field {
    Field { name, kind: FieldKind::Flag, label, help: None }
}

/// All operator settings, grouped as shown in the admin form.
pub(crate) const SECTIONS: &[(&str, &[Field])] = &[
    ("Copyright", &[
        flag("showCopyRight", "Show a copyright notice in the footer"),
        Field { help: Some("(four digits, e.g. 2015)"), ..text("copyRightStartYear", "First year of the copyright") },
        text("copyRightName", "Name of the copyright holder"),
    ]),
    ("Responsible person", &[
        text("responsibleFirst", "First name(s)"),
        text("responsibleSurname", "Surname"),
        Field { name: "responsibleSex", kind: FieldKind::Sex, label: "Salutation", help: Some("(used for the first line of a pre-filled e-mail)") },
        flag("showGravatar", "Show the Gravatar image of the e-mail address"),
    ]),
    ("Address", &[
        text("organization", "Organization"),
        text("additionalAddress", "Additional address line"),
        text("street", "Street and house number"),
        text("city", "Postal code and city"),
    ]),
    ("Contact", &[
        text("phone", "Phone"),
        text("fax", "Fax"),
        text("email", "E-mail address"),
        Field { help: Some("(a plain mailto link without subject and salutation)"), ..flag("simpleEmail", "Use a simple e-mail link") },
    ]),
    ("Registration", &[
        Field { help: Some("(e.g. “VAT number” or “Register court”)"), ..text("vatNumberLabel", "Label of the registration number") },
        text("vatNumber", "VAT or other registration number"),
    ]),
    ("Further contacts", &[
        flag("showTreeContacts", "Show the genealogy and technical contacts of the family tree"),
        flag("showAdministrators", "Show the website administrators"),
    ]),
    ("Hosting", &[
        Field { help: Some("(in English, e.g. Germany)"), ..text("hostingCountry", "Country of the server location") },
        text("hostingCompanyName", "Hosting company"),
        text("hostingCompanyUrl", "Website of the hosting company"),
        text("hostingPrivacyNotice", "Privacy notice of the hosting company"),
        text("hostingStartDate", "Data processing agreement concluded on"),
        text("hostingEndDate", "Data processing agreement last updated on"),
    ]),
];

pub(crate) fn fields() -> impl Iterator<Item = &'static Field> {
    SECTIONS.iter().flat_map(|(_, fields)| fields.iter())
}

/// Stores submitted admin form values. Unchecked checkboxes are absent from `submitted` and stored as off.
pub(crate) fn save(prefs: &mut impl PreferenceStore, submitted: &HashMap<String, String>) {
    for field in fields() {
        let raw = submitted.get(field.name).map(|value| value.trim());
        let value = match field.kind {
            FieldKind::Text => raw.unwrap_or_default(),
            FieldKind::Flag => if raw.is_some_and(|value| !value.is_empty() && value != "0") { "1" } else { "0" },
            FieldKind::Sex => match raw {
                Some(sex @ ("M" | "F")) => sex,
                _ => "U",
            },
        };
        prefs.set_preference(field.name, value);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Sex {
    Male,
    Female,
    Unspecified,
}

/// Typed read access to the operator settings.
pub(crate) struct Settings<'a, P: PreferenceStore> {
    prefs: &'a P,
}

impl<'a, P: PreferenceStore> Settings<'a, P> {
    pub(crate) fn new(prefs: &'a P) -> Self {
        Self { prefs }
    }

    fn text(&self, name: &str) -> &'a str {
        self.prefs.preference_or(name, "")
    }

    pub(crate) fn show_copyright(&self) -> bool { self.prefs.flag("showCopyRight") }
    pub(crate) fn copyright_start_year(&self) -> &'a str { self.text("copyRightStartYear") }
    pub(crate) fn copyright_name(&self) -> &'a str { self.text("copyRightName") }
    pub(crate) fn responsible_first(&self) -> &'a str { self.text("responsibleFirst") }
    pub(crate) fn responsible_surname(&self) -> &'a str { self.text("responsibleSurname") }
    pub(crate) fn show_gravatar(&self) -> bool { self.prefs.flag("showGravatar") }
    pub(crate) fn organization(&self) -> &'a str { self.text("organization") }
    pub(crate) fn additional_address(&self) -> &'a str { self.text("additionalAddress") }
    pub(crate) fn street(&self) -> &'a str { self.text("street") }
    pub(crate) fn city(&self) -> &'a str { self.text("city") }
    pub(crate) fn phone(&self) -> &'a str { self.text("phone") }
    pub(crate) fn fax(&self) -> &'a str { self.text("fax") }
    pub(crate) fn email(&self) -> &'a str { self.text("email") }
    pub(crate) fn simple_email(&self) -> bool { self.prefs.flag("simpleEmail") }
    pub(crate) fn vat_number_label(&self) -> &'a str { self.text("vatNumberLabel") }
    pub(crate) fn vat_number(&self) -> &'a str { self.text("vatNumber") }
    pub(crate) fn show_tree_contacts(&self) -> bool { self.prefs.flag("showTreeContacts") }
    pub(crate) fn show_administrators(&self) -> bool { self.prefs.flag("showAdministrators") }
    pub(crate) fn hosting_country(&self) -> &'a str { self.text("hostingCountry") }
    pub(crate) fn hosting_company_name(&self) -> &'a str { self.text("hostingCompanyName") }
    pub(crate) fn hosting_company_url(&self) -> &'a str { self.text("hostingCompanyUrl") }
    pub(crate) fn hosting_privacy_notice(&self) -> &'a str { self.text("hostingPrivacyNotice") }
    pub(crate) fn hosting_start_date(&self) -> &'a str { self.text("hostingStartDate") }
    pub(crate) fn hosting_end_date(&self) -> &'a str { self.text("hostingEndDate") }

    /// First name and surname, in that order.
    pub(crate) fn responsible_name(&self) -> String {
        format!("{} {}", self.responsible_first(), self.responsible_surname()).trim().to_owned()
    }

    pub(crate) fn responsible_sex(&self) -> Sex {
        match self.prefs.preference_or("responsibleSex", "M") {
            "M" => Sex::Male,
            "F" => Sex::Female,
            _ => Sex::Unspecified,
        }
    }

    pub(crate) fn has_hosting_details(&self) -> bool {
        [self.hosting_company_name(), self.hosting_company_url(), self.hosting_privacy_notice(), self.hosting_start_date(), self.hosting_end_date()].iter().any(|value| !value.is_empty())
    }

    /// The footer copyright line, e.g. `© 2015–2026 Jane Doe`.
    pub(crate) fn copyright_notice(&self, current_year: i32) -> Option<String> {
        if !self.show_copyright() { return None }
        let start = self.copyright_start_year().trim();
        // a start year in the future would make the range run backwards
        let years = if start.is_empty() || start.parse::<i32>().is_ok_and(|start| start >= current_year) {
            current_year.to_string()
        } else {
            format!("{start}–{current_year}")
        };
        let name = self.copyright_name().trim();
        Some(if name.is_empty() { format!("© {years}") } else { format!("© {years} {name}") })
    }

    /// The operator's e-mail address as a link, or `None` if it isn't set.
    ///
    /// Unless the simple mode is configured, the link pre-fills a subject
    /// naming `site` and a salutation chosen by [`Self::responsible_sex`].
    pub(crate) fn email_link(&self, site: &str) -> Option<RawHtml<String>> {
        let address = self.email().trim();
        if address.is_empty() { return None }
        Some(if self.simple_email() {
            mailto(address)
        } else {
            let salutation = match self.responsible_sex() {
                Sex::Male => format!("Dear Mr. {},", self.responsible_surname()),
                Sex::Female => format!("Dear Mrs. {},", self.responsible_surname()),
                Sex::Unspecified => format!("Dear {},", self.responsible_name()),
            };
            mailto_with_message(address, &format!("message via legal notice of site {site}"), &salutation)
        })
    }
}

pub(crate) fn mailto(address: &str) -> RawHtml<String> {
    html! {
        a(href = format!("mailto:{address}")) : address;
    }
}

pub(crate) fn mailto_with_message(address: &str, subject: &str, body: &str) -> RawHtml<String> {
    html! {
        a(href = format!("mailto:{address}?subject={}&body={}", urlencoding::encode(subject), urlencoding::encode(body))) : address;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_email_is_plain_mailto() {
        let prefs = Preferences::from_iter([("email", "x@y.com"), ("simpleEmail", "1"), ("responsibleSurname", "Doe")]);
        let link = Settings::new(&prefs).email_link("example.org").expect("email is set").0;
        assert!(link.starts_with("<a href=\"mailto:x@y.com\""), "{link}");
        assert!(link.ends_with(">x@y.com</a>"), "{link}");
        assert!(!link.contains("subject"));
        assert!(!link.contains("body"));
    }

    #[test]
    fn email_is_escaped() {
        let link = mailto("a<b>@y.com").0;
        assert!(!link.contains("<b>"));
        assert!(link.contains("a&lt;b&gt;@y.com"));
    }

    #[test]
    fn templated_email_uses_salutation() {
        let mut prefs = Preferences::from_iter([("email", "jane@example.org"), ("responsibleFirst", "Jane"), ("responsibleSurname", "Doe"), ("responsibleSex", "F")]);
        let link = Settings::new(&prefs).email_link("ahnen.example.org").expect("email is set").0;
        assert!(link.contains("subject=message%20via%20legal%20notice%20of%20site%20ahnen.example.org"), "{link}");
        assert!(link.contains("&amp;body=Dear%20Mrs.%20Doe%2C"), "{link}");
        prefs.set_preference("responsibleSex", "U");
        let link = Settings::new(&prefs).email_link("ahnen.example.org").expect("email is set").0;
        assert!(link.contains("body=Dear%20Jane%20Doe%2C"), "{link}");
        prefs.set_preference("responsibleSex", "M");
        let link = Settings::new(&prefs).email_link("ahnen.example.org").expect("email is set").0;
        assert!(link.contains("body=Dear%20Mr.%20Doe%2C"), "{link}");
    }

    #[test]
    fn missing_email_renders_nothing() {
        assert!(Settings::new(&Preferences::default()).email_link("example.org").is_none());
        assert_eq!(Settings::new(&Preferences::default()).responsible_sex(), Sex::Male);
    }

    #[test]
    fn responsible_name_is_trimmed() {
        let prefs = Preferences::from_iter([("responsibleSurname", "Doe")]);
        assert_eq!(Settings::new(&prefs).responsible_name(), "Doe");
    }

    #[test]
    fn copyright_notice_collapses_year_range() {
        let mut prefs = Preferences::from_iter([("showCopyRight", "1"), ("copyRightStartYear", "2015"), ("copyRightName", "Jane Doe")]);
        assert_eq!(Settings::new(&prefs).copyright_notice(2026).as_deref(), Some("© 2015–2026 Jane Doe"));
        prefs.set_preference("copyRightStartYear", "2026");
        assert_eq!(Settings::new(&prefs).copyright_notice(2026).as_deref(), Some("© 2026 Jane Doe"));
        prefs.set_preference("showCopyRight", "0");
        assert_eq!(Settings::new(&prefs).copyright_notice(2026), None);
    }

    #[test]
    fn future_start_year_is_not_a_range() {
        let mut prefs = Preferences::from_iter([("showCopyRight", "1"), ("copyRightStartYear", "2030"), ("copyRightName", "Jane Doe")]);
        assert_eq!(Settings::new(&prefs).copyright_notice(2026).as_deref(), Some("© 2026 Jane Doe"));
        prefs.set_preference("copyRightStartYear", " 2026 ");
        assert_eq!(Settings::new(&prefs).copyright_notice(2026).as_deref(), Some("© 2026 Jane Doe"));
        prefs.set_preference("showCopyRight", "0");
        assert_eq!(Settings::new(&prefs).copyright_notice(2026), None);
    }

    #[test]
    fn form_save_normalizes_values() {
        let mut prefs = Preferences::from_iter([("showGravatar", "1"), ("phone", "old")]);
        let submitted = HashMap::from([
            (format!("phone"), format!("  +49 123  ")),
            (format!("showTreeContacts"), format!("on")),
            (format!("responsibleSex"), format!("X")),
        ]);
        save(&mut prefs, &submitted);
        let settings = Settings::new(&prefs);
        assert_eq!(settings.phone(), "+49 123");
        assert_eq!(settings.street(), "");
        assert!(settings.show_tree_contacts());
        assert!(!settings.show_gravatar(), "unchecked box turns the flag off");
        assert_eq!(prefs.preference("responsibleSex"), Some("U"));
        assert_eq!(fields().count(), 25);
    }
}
