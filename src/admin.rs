//! The administrator's settings form for the legal notice.

use crate::{
    catalog::ContentParams,
    order,
    prefs,
    prelude::*,
    settings::{
        self,
        FieldKind,
        SECTIONS,
    },
};

fn field_name(map: &str, key: &str) -> String {
    format!("{map}[{key}]")
}

/// Whether `ctx` holds a submission being redisplayed. Every submission carries the `order` list.
fn is_resubmission(ctx: &Context<'_>) -> bool {
    ctx.field_value("order").is_some()
}

/// Checkbox state: as submitted when redisplaying a submission (where an unchecked box is simply absent), otherwise as stored.
fn checked(ctx: &Context<'_>, name: &str, stored: bool) -> bool {
    if is_resubmission(ctx) {
        ctx.field_value(name).is_some_and(|value| !value.is_empty() && value != "0")
    } else {
        stored
    }
}

fn settings_fields(prefs: &Preferences, ctx: &Context<'_>) -> RawHtml<String> {
    html! {
        @for (section, fields) in SECTIONS {
            fieldset {
                legend : *section;
                @for field in *fields {
                    @let name = field_name("settings", field.name);
                    div {
                        @match field.kind {
                            FieldKind::Text => {
                                label(for = &name) : field.label;
                                input(type = "text", id = &name, name = &name, value = ctx.field_value(&*name).unwrap_or_else(|| prefs.preference_or(field.name, "")));
                            }
                            FieldKind::Flag => {
                                input(type = "checkbox", id = &name, name = &name, value = "1", checked? = checked(ctx, &name, prefs.flag(field.name)));
                                label(for = &name) : field.label;
                            }
                            FieldKind::Sex => {
                                @let current = ctx.field_value(&*name).unwrap_or_else(|| prefs.preference_or(field.name, "U"));
                                label(for = &name) : field.label;
                                select(id = &name, name = &name) {
                                    option(value = "M", selected? = current == "M") : "Mr.";
                                    option(value = "F", selected? = current == "F") : "Mrs.";
                                    option(value = "U", selected? = current != "M" && current != "F") : "unspecified";
                                }
                            }
                        }
                        @if let Some(help) = field.help {
                            p(class = "help") : help;
                        }
                    }
                }
            }
        }
    }
}

fn chapter_table(chapters: &[Chapter], ctx: &Context<'_>) -> RawHtml<String> {
    html! {
        table(class = "chapters") {
            thead {
                tr {
                    th : "Position";
                    th : "Chapter";
                    th : "Show";
                }
            }
            tbody {
                @for (idx, chapter) in chapters.iter().enumerate() {
                    @let position = field_name("position", chapter.key());
                    @let status = field_name("status", chapter.key());
                    tr {
                        td {
                            input(type = "hidden", name = "order", value = chapter.key());
                            input(type = "number", min = "1", name = &position, value = ctx.field_value(&*position).map_or_else(|| (idx + 1).to_string(), str::to_owned));
                        }
                        td(class = format!("level-{}", chapter.level().number())) : chapter.heading();
                        td {
                            input(type = "checkbox", name = &status, value = "on", checked? = checked(ctx, &status, chapter.enabled()));
                        }
                    }
                }
            }
        }
        p(class = "help") : "Sub-chapters are only shown while their chapter is shown.";
    }
}

fn settings_form(me: &Admin, prefs: &Preferences, chapters: &[Chapter], csrf: Option<&CsrfToken>, ctx: Context<'_>, flash: Option<FlashMessage<'_>>) -> RawHtml<String> {
    page(Some(&me.0), None, "Legal Notice Settings", html! {
        h1 : "Legal Notice Settings";
        @if let Some(flash) = flash {
            p(class = flash.kind()) : flash.message();
        }
        @for error in ctx.errors() {
            p(class = "error") : error.to_string();
        }
        form(method = "post", action = uri!(post)) {
            : csrf;
            : settings_fields(prefs, &ctx);
            h2 : "Chapters";
            : chapter_table(chapters, &ctx);
            div {
                button(type = "submit", name = "save", value = "1") : "Save";
                a(href = uri!(get)) : "Cancel";
            }
        }
    })
}

#[rocket::get("/admin/legal-notice")]
pub(crate) async fn get(pool: &State<PgPool>, me: Admin, csrf: Option<CsrfToken>, flash: Option<FlashMessage<'_>>) -> Result<RawHtml<String>, StatusOrError<PageError>> {
    let mut transaction = pool.begin().await?;
    let prefs = Preferences::load(&mut transaction, prefs::MODULE).await?;
    transaction.commit().await?;
    let chapters = order::merge(&Catalog::CURRENT, &prefs, ContentParams::default())?;
    Ok(settings_form(&me, &prefs, &chapters, csrf.as_ref(), Context::default(), flash))
}

#[derive(FromForm, CsrfForm)]
pub(crate) struct SettingsForm {
    #[field(default = String::new())]
    csrf: String,
    #[field(default = String::new())]
    save: String,
    #[field(default = HashMap::new())]
    settings: HashMap<String, String>,
    #[field(default = Vec::new())]
    order: Vec<String>,
    #[field(default = HashMap::new())]
    position: HashMap<String, usize>,
    #[field(default = HashMap::new())]
    status: HashMap<String, String>,
}

/// Writes a submission into `prefs`. Returns `false`, leaving `prefs` untouched, unless it came from the save button.
fn apply(prefs: &mut impl PreferenceStore, form: &SettingsForm) -> bool {
    if form.save != "1" { return false }
    settings::save(prefs, &form.settings);
    let chapter_order = order::submitted_order(&Catalog::CURRENT, &form.order, &form.position);
    let enabled = form.status.iter().filter(|(_, status)| *status == "on").map(|(key, _)| key.as_str()).collect();
    order::save(&Catalog::CURRENT, prefs, &chapter_order, &enabled);
    true
}

#[rocket::post("/admin/legal-notice", data = "<form>")]
pub(crate) async fn post(pool: &State<PgPool>, me: Admin, csrf: Option<CsrfToken>, form: Form<Contextual<'_, SettingsForm>>) -> Result<RedirectOrContent, StatusOrError<PageError>> {
    let mut form = form.into_inner();
    form.verify(&csrf);
    let mut transaction = pool.begin().await?;
    let mut prefs = Preferences::load(&mut transaction, prefs::MODULE).await?;
    Ok(match form.value {
        Some(ref value) if form.context.errors().next().is_none() => if apply(&mut prefs, value) {
            if prefs.is_changed() {
                prefs.save(&mut transaction, prefs::MODULE).await?;
                log::info!("legal notice settings updated by {} ({})", me.0.0.user_name, me.0.0.id);
            }
            transaction.commit().await?;
            RedirectOrContent::Flash(Flash::success(Redirect::to(uri!(get)), "The preferences for the legal notice have been updated."))
        } else {
            transaction.commit().await?;
            RedirectOrContent::Redirect(Redirect::to(uri!(get)))
        },
        _ => {
            transaction.commit().await?;
            let chapters = order::merge(&Catalog::CURRENT, &prefs, ContentParams::default())?;
            RedirectOrContent::Content(settings_form(&me, &prefs, &chapters, csrf.as_ref(), form.context, None))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(save: &str, status: &[&str]) -> SettingsForm {
        SettingsForm {
            csrf: String::default(),
            save: save.to_owned(),
            settings: HashMap::from([(format!("street"), format!("Main Street 1"))]),
            order: Catalog::CURRENT.keys().map(str::to_owned).collect(),
            position: HashMap::default(),
            status: status.iter().map(|key| (key.to_string(), format!("on"))).collect(),
        }
    }

    #[test]
    fn form_reflects_stored_preferences() {
        let prefs = Preferences::from_iter([("street", "Main Street 1"), ("showGravatar", "1"), ("responsibleSex", "F")]);
        let html = settings_fields(&prefs, &Context::default()).0;
        assert!(html.contains("name=\"settings[street]\""));
        assert!(html.contains("value=\"Main Street 1\""));
        assert!(html.contains("name=\"settings[hostingEndDate]\""));
        assert_eq!(html.matches("type=\"checkbox\"").count(), 5);
        assert_eq!(html.matches("checked").count(), 1);
        assert!(html.contains("<option value=\"F\" selected"), "{html}");
    }

    #[test]
    fn unset_salutation_is_unspecified() {
        let html = settings_fields(&Preferences::default(), &Context::default()).0;
        assert!(html.contains("<option value=\"U\" selected"), "{html}");
    }

    #[test]
    fn chapter_rows_follow_merged_order() {
        let prefs = Preferences::from_iter([("order", "Copyright,DataProtection"), ("status-Copyright", "0")]);
        let chapters = order::merge(&Catalog::CURRENT, &prefs, ContentParams::default()).expect("current catalog");
        let html = chapter_table(&chapters, &Context::default()).0;
        assert_eq!(html.matches("name=\"order\"").count(), Catalog::CURRENT.len());
        let copyright = html.find("value=\"Copyright\"").expect("copyright row");
        let data_protection = html.find("value=\"DataProtection\"").expect("data protection row");
        assert!(copyright < data_protection);
        assert!(html.contains("name=\"position[Copyright]\" value=\"1\""), "{html}");
        assert_eq!(html.matches("checked").count(), Catalog::CURRENT.len() - 1);
    }

    #[test]
    fn invalid_submission_is_redisplayed_as_entered() {
        let prefs = Preferences::from_iter([("street", "Old Street 2"), ("showGravatar", "1"), ("responsibleSex", "F")]);
        let chapters = order::merge(&Catalog::CURRENT, &prefs, ContentParams::default()).expect("current catalog");
        let submitted = Form::<Contextual<'_, SettingsForm>>::parse("order=Copyright&position[Copyright]=first&settings[street]=Elm&settings[showCopyRight]=1&settings[responsibleSex]=M&status[Copyright]=on").expect("contextual forms always parse");
        assert!(submitted.context.errors().next().is_some());
        let html = settings_fields(&prefs, &submitted.context).0;
        assert!(html.contains("value=\"Elm\""), "{html}");
        assert!(!html.contains("Old Street 2"));
        assert!(html.contains("<option value=\"M\" selected"), "{html}");
        assert!(html.contains("name=\"settings[showCopyRight]\" value=\"1\" checked"), "{html}");
        assert!(!html.contains("name=\"settings[showGravatar]\" value=\"1\" checked"), "unchecked box is absent from the submission");
        let html = chapter_table(&chapters, &submitted.context).0;
        assert!(html.contains("name=\"position[Copyright]\" value=\"first\""), "{html}");
        assert_eq!(html.matches("checked").count(), 1);
    }

    #[test]
    fn submission_without_save_changes_nothing() {
        let mut prefs = Preferences::from_iter([("street", "Old Street 2")]);
        assert!(!apply(&mut prefs, &submission("", &[])));
        assert!(!prefs.is_changed());
        assert_eq!(prefs.preference("street"), Some("Old Street 2"));
    }

    #[test]
    fn saved_submission_resets_omitted_statuses() {
        let mut prefs = Preferences::from_iter([("status-Copyright", "on"), ("status-DataProtection", "on")]);
        assert!(apply(&mut prefs, &submission("1", &["Copyright"])));
        assert!(prefs.is_changed());
        assert_eq!(prefs.preference("street"), Some("Main Street 1"));
        assert_eq!(prefs.preference("status-Copyright"), Some("on"));
        assert_eq!(prefs.preference("status-DataProtection"), Some("0"));
        let chapters = order::merge(&Catalog::CURRENT, &prefs, ContentParams::default()).expect("current catalog");
        assert_eq!(chapters.iter().filter(|chapter| chapter.enabled()).map(Chapter::key).collect_vec(), ["Copyright"]);
        assert_eq!(prefs.preference("order"), Some(&*Catalog::CURRENT.keys().join(",")));
    }
}
