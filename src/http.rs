use {
    base64::engine::{
        Engine as _,
        general_purpose::STANDARD as BASE64,
    },
    rocket::{
        Rocket,
        config::SecretKey,
        fs::FileServer,
        response::content::RawText,
    },
    rocket_util::Doctype,
    crate::{
        admin,
        catalog,
        legal,
        prelude::*,
    },
};

#[derive(Responder)]
pub(crate) enum RedirectOrContent {
    Redirect(Redirect),
    Flash(Flash<Redirect>),
    Content(RawHtml<String>),
}

#[derive(Responder)]
pub(crate) enum StatusOrError<E> {
    Status(Status),
    Err(E),
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum PageError {
    #[error(transparent)] Catalog(#[from] catalog::Error),
    #[error(transparent)] Sql(#[from] sqlx::Error),
}

impl<E: Into<PageError>> From<E> for StatusOrError<PageError> {
    fn from(e: E) -> Self {
        Self::Err(e.into())
    }
}

impl<'r> rocket::response::Responder<'r, 'static> for PageError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        log::error!("responded with {} to request to {}: {self} ({self:?})", Status::InternalServerError, request.uri());
        Err(Status::InternalServerError)
    }
}

pub(crate) fn page(me: Option<&User>, footer: Option<RawHtml<String>>, title: &str, content: impl ToHtml) -> RawHtml<String> {
    html! {
        : Doctype;
        html {
            head {
                meta(charset = "utf-8");
                title : title;
                meta(name = "viewport", content = "width=device-width, initial-scale=1, shrink-to-fit=no");
                link(rel = "stylesheet", href = "/static/legal-notice.css");
            }
            body {
                nav {
                    @if let Some(me) = me {
                        : "Signed in as ";
                        bdi : me.0.display_name();
                        @if me.0.is_admin {
                            br;
                            a(href = uri!(admin::get)) : "Legal notice settings";
                        }
                    }
                }
                main {
                    : content;
                }
                : footer;
            }
        }
    }
}

#[rocket::get("/robots.txt")]
async fn robots_txt() -> RawText<&'static str> {
    RawText("User-agent: *\nDisallow: /admin/\nDisallow: /static/\n")
}

#[rocket::catch(403)]
async fn forbidden(request: &Request<'_>) -> RawHtml<String> {
    let me = request.guard::<User>().await.succeeded();
    page(me.as_ref(), None, "Forbidden", html! {
        h1 : "Error 403: Forbidden";
        p : "This page is for site administrators only.";
    })
}

#[rocket::catch(404)]
async fn not_found(request: &Request<'_>) -> RawHtml<String> {
    let me = request.guard::<User>().await.succeeded();
    page(me.as_ref(), None, "Not Found", html! {
        h1 : "Error 404: Not Found";
    })
}

#[rocket::catch(500)]
async fn internal_server_error(request: &Request<'_>) -> RawHtml<String> {
    let me = request.guard::<User>().await.succeeded();
    page(me.as_ref(), None, "Internal Server Error", html! {
        h1 : "Error 500: Internal Server Error";
        p : "Sorry, something went wrong. Please notify the site administrator.";
    })
}

#[rocket::catch(default)]
async fn fallback_catcher(status: Status, request: &Request<'_>) -> RawHtml<String> {
    log::warn!("responding with unexpected HTTP status code {} {} to request {request:?}", status.code, status.reason_lossy());
    let me = request.guard::<User>().await.succeeded();
    page(me.as_ref(), None, status.reason_lossy(), html! {
        h1 {
            : "Error ";
            : status.code;
            : ": ";
            : status.reason_lossy();
        }
        p : "Sorry, something went wrong. Please notify the site administrator.";
    })
}

pub(crate) async fn rocket(pool: PgPool, config: Config, port: u16) -> Result<Rocket<rocket::Ignite>, crate::Error> {
    Ok(rocket::custom(rocket::Config::figment().merge(rocket::Config {
        secret_key: SecretKey::from(&BASE64.decode(&config.secret_key)?),
        log_level: Some(rocket::config::Level::ERROR),
        ..rocket::Config::default()
    }).merge(("port", port)))
    .mount("/", rocket::routes![
        robots_txt,
        legal::get,
        admin::get,
        admin::post,
    ])
    .mount("/static", FileServer::without_index("assets/static"))
    .register("/", rocket::catchers![
        forbidden,
        not_found,
        internal_server_error,
        fallback_catcher,
    ])
    .attach(rocket_csrf::Fairing::default())
    .manage(config)
    .manage(pool)
    .ignite().await?)
}
